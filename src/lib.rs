pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig};
pub use core::engine::StoreEngine;
pub use core::snapshot::{LoadOutcome, Snapshot};
pub use domain::model::{Inventory, Textbook};
pub use utils::error::{Result, StoreError};
