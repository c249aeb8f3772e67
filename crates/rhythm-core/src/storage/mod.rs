mod config;
pub mod database;

pub use config::{Config, HabitConfig, RoutineConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/rhythm[-dev]/` based on RHYTHM_ENV.
///
/// Set RHYTHM_ENV=dev to use the development data directory, or
/// RHYTHM_DATA_DIR to point at an arbitrary directory (used by the
/// end-to-end tests).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var("RHYTHM_DATA_DIR") {
        Ok(custom) => PathBuf::from(custom),
        Err(_) => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RHYTHM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rhythm-dev")
            } else {
                base_dir.join("rhythm")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
