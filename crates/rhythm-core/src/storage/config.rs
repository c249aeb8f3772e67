//! TOML-based application configuration.
//!
//! Stores user preferences for both trackers:
//! - Default task duration and the estimate auto-update default
//! - Trend window size, long-press threshold, and the habit color palette
//!
//! Configuration is stored at `<data dir>/config.toml`. Every field is
//! serde-defaulted so added keys are backward compatible.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Routine tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineConfig {
    /// Estimated seconds pre-filled for a new task.
    #[serde(default = "default_task_seconds")]
    pub default_task_seconds: u32,
    /// Default for a new routine's auto-update flag.
    #[serde(default = "default_true")]
    pub auto_update_estimates: bool,
}

/// Habit tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitConfig {
    #[serde(default = "default_window_days")]
    pub trend_window_days: u32,
    /// Press-and-hold threshold in milliseconds.
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    /// Color tokens assigned round-robin to new items.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routine: RoutineConfig,
    #[serde(default)]
    pub habit: HabitConfig,
}

fn default_task_seconds() -> u32 {
    300
}
fn default_true() -> bool {
    true
}
fn default_window_days() -> u32 {
    7
}
fn default_long_press_ms() -> u64 {
    800
}
fn default_palette() -> Vec<String> {
    [
        "#4bc0c0", "#ff6384", "#ffcd56", "#36a2eb", "#9966ff", "#ff9f40",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            default_task_seconds: default_task_seconds(),
            auto_update_estimates: default_true(),
        }
    }
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            trend_window_days: default_window_days(),
            long_press_ms: default_long_press_ms(),
            palette: default_palette(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Write the configuration back to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a value by dotted key, e.g. `habit.trend_window_days`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "routine.default_task_seconds" => Ok(self.routine.default_task_seconds.to_string()),
            "routine.auto_update_estimates" => Ok(self.routine.auto_update_estimates.to_string()),
            "habit.trend_window_days" => Ok(self.habit.trend_window_days.to_string()),
            "habit.long_press_ms" => Ok(self.habit.long_press_ms.to_string()),
            "habit.palette" => Ok(self.habit.palette.join(",")),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Set a value by dotted key. The value is parsed according to the
    /// field's type; parse failures never touch the config.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "routine.default_task_seconds" => {
                self.routine.default_task_seconds =
                    value.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
            }
            "routine.auto_update_estimates" => {
                self.routine.auto_update_estimates =
                    value.parse().map_err(|e: std::str::ParseBoolError| invalid(e.to_string()))?;
            }
            "habit.trend_window_days" => {
                let days: u32 =
                    value.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
                if days == 0 {
                    return Err(invalid("window must be at least one day".to_string()));
                }
                self.habit.trend_window_days = days;
            }
            "habit.long_press_ms" => {
                self.habit.long_press_ms =
                    value.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
            }
            "habit.palette" => {
                self.habit.palette = value.split(',').map(|s| s.trim().to_string()).collect();
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// All known keys with their current values, for `config list`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        [
            "routine.default_task_seconds",
            "routine.auto_update_estimates",
            "habit.trend_window_days",
            "habit.long_press_ms",
            "habit.palette",
        ]
        .iter()
        .map(|k| (*k, self.get(k).unwrap_or_default()))
        .collect()
    }
}
