use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::RadioError;
use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub radio: RadioConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Loads `config.toml`, then `config.default.toml`, then built-in
    /// defaults when neither exists.
    pub fn load() -> Result<Self, RadioError> {
        let config_path = if std::path::Path::new("config.toml").exists() {
            "config.toml"
        } else if std::path::Path::new("config.default.toml").exists() {
            "config.default.toml"
        } else {
            info!("no config.toml found, using built-in defaults");
            return Ok(Self::default());
        };

        let config_str = std::fs::read_to_string(config_path)
            .map_err(|e| RadioError::InvalidConfiguration(format!("{}: {}", config_path, e)))?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| RadioError::InvalidConfiguration(format!("{}: {}", config_path, e)))?;

        info!("loaded configuration from {}", config_path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RadioError> {
        self.radio.validate()
    }
}
