pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Default snapshot file, relative to the base path.
pub const DEFAULT_DATA_FILE: &str = "inventory.ser";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "textbook-store")]
#[command(about = "An interactive inventory manager for a textbook catalog")]
pub struct CliConfig {
    /// Snapshot file holding the persisted inventory
    #[arg(long)]
    pub data_file: Option<String>,

    /// Directory the snapshot file is resolved against
    #[arg(long, default_value = ".")]
    pub base_path: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn data_file(&self) -> &str {
        self.data_file.as_deref().unwrap_or(DEFAULT_DATA_FILE)
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_file", ConfigProvider::data_file(self))?;
        validation::validate_path("base_path", &self.base_path)?;
        Ok(())
    }
}
