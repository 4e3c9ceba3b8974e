mod schema;

pub use schema::*;

use std::path::Path;
use thiserror::Error;

/// Environment variables that override individual config fields
pub const ENV_DB_HOST: &str = "EXPORT_DB_HOST";
pub const ENV_DB_PORT: &str = "EXPORT_DB_PORT";
pub const ENV_DB_USER: &str = "EXPORT_DB_USER";
pub const ENV_DB_PASSWORD: &str = "EXPORT_DB_PASSWORD";
pub const ENV_DB_NAME: &str = "EXPORT_DB_NAME";
pub const ENV_OUTPUT_DIR: &str = "EXPORT_OUTPUT_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

impl Config {
    /// Apply overrides from a variable lookup (normally `std::env::var`).
    ///
    /// Only variables that are present replace the loaded value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_DB_HOST) {
            self.database.host = host;
        }
        if let Some(port) = lookup(ENV_DB_PORT) {
            self.database.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_DB_PORT,
                value: port,
            })?;
        }
        if let Some(user) = lookup(ENV_DB_USER) {
            self.database.user = user;
        }
        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            self.database.password = password;
        }
        if let Some(database) = lookup(ENV_DB_NAME) {
            self.database.database = database;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output.directory = dir.into();
        }
        Ok(())
    }
}
