use crate::core::ConfigProvider;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreTomlConfig {
    pub store: StoreSection,
    pub persistence: PersistenceSection,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceSection {
    pub data_file: String,
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
}

impl StoreTomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StoreError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORE_DATA_FILE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("store.name", &self.store.name)?;
        crate::utils::validation::validate_path(
            "persistence.data_file",
            &self.persistence.data_file,
        )?;

        if let Some(base_path) = &self.persistence.base_path {
            crate::utils::validation::validate_path("persistence.base_path", base_path)?;
        }

        Ok(())
    }

    pub fn verbose_enabled(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl ConfigProvider for StoreTomlConfig {
    fn data_file(&self) -> &str {
        &self.persistence.data_file
    }

    fn base_path(&self) -> &str {
        self.persistence.base_path.as_deref().unwrap_or(".")
    }

    fn verbose(&self) -> bool {
        self.verbose_enabled()
    }
}

impl Validate for StoreTomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
