//! TOML-based application configuration.
//!
//! Stores:
//! - Block length used when partitioning days
//! - Wake/sleep times offered by the setup flow
//! - Which storage backend holds the day collection
//!
//! Configuration is stored at `~/.config/fifteen/config.toml`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::day::DEFAULT_SLICE_MINUTES;
use crate::error::ConfigError;
use crate::setup::parse_clock_time;

/// Block partitioning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksConfig {
    #[serde(default = "default_slice_minutes")]
    pub slice_minutes: u32,
}

/// Times pre-filled by the setup flow (HH:MM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    #[serde(default = "default_wake")]
    pub default_wake: String,
    #[serde(default = "default_sleep")]
    pub default_sleep: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/fifteen/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub blocks: BlocksConfig,
    #[serde(default)]
    pub setup: SetupConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_slice_minutes() -> u32 {
    DEFAULT_SLICE_MINUTES as u32
}
fn default_wake() -> String {
    "07:00".into()
}
fn default_sleep() -> String {
    "23:00".into()
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            slice_minutes: default_slice_minutes(),
        }
    }
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            default_wake: default_wake(),
            default_sleep: default_sleep(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        key.split('.').try_fold(root, |current, part| current.get(part))
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let slot = key
            .split('.')
            .try_fold(root, |current, part| current.get_mut(part))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match &*slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
            _ => serde_json::Value::String(value.into()),
        };
        *slot = new_value;
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    /// Any other read failure is an error and leaves the file alone.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blocks.slice_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "blocks.slice_minutes".into(),
                message: "must be at least 1".into(),
            });
        }
        for (key, value) in [
            ("setup.default_wake", &self.setup.default_wake),
            ("setup.default_sleep", &self.setup.default_sleep),
        ] {
            parse_clock_time(value).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Block length as a duration.
    pub fn slice_length(&self) -> Duration {
        Duration::minutes(i64::from(self.blocks.slice_minutes.max(1)))
    }
}
