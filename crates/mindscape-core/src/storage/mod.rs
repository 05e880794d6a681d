mod config;
pub mod database;
pub mod kv;

pub use config::{CoachConfig, Config, FlowConfig, TemperatureUnit, TodoConfig, WeatherConfig};
pub use database::{Database, MemoryStore};
pub use kv::{KeyValueStore, KeyValueStoreExt};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/mindscape[-dev]/` based on MINDSCAPE_ENV.
///
/// Set MINDSCAPE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINDSCAPE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("mindscape-dev")
    } else {
        base_dir.join("mindscape")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
