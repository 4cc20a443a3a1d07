mod config;
pub mod database;

pub use config::{Config, ResetConfig, StorageConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/praxis[-dev]/` based on PRAXIS_ENV.
///
/// Set PRAXIS_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PRAXIS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("praxis-dev")
    } else {
        base_dir.join("praxis")
    };

    std::fs::create_dir_all(&dir).map_err(|err| ConfigError::DataDir(err.to_string()))?;
    Ok(dir)
}
