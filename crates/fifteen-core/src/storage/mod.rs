//! Persistence port and its backends, plus configuration.

mod config;
pub mod database;
pub mod json_file;
pub mod memory;

pub use config::{BlocksConfig, Config, SetupConfig, StorageBackend, StorageConfig};
pub use database::Database;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::day::DayRecord;
use crate::error::{ConfigError, StorageError};

/// Global wake/sleep defaults, kept next to the day collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDefaults {
    pub wake: Option<NaiveDateTime>,
    pub sleep: Option<NaiveDateTime>,
}

/// Synchronous read-all / write-all storage used by [`crate::DayStore`].
///
/// The collection crosses this boundary as a date-ordered sequence, at
/// most one record per date. A backend holding nothing reads as empty.
pub trait DayPersistence {
    fn read_all(&self) -> Result<Vec<DayRecord>, StorageError>;
    fn write_all(&self, days: &[DayRecord]) -> Result<(), StorageError>;
    fn read_defaults(&self) -> Result<TimeDefaults, StorageError>;
    fn write_defaults(&self, defaults: &TimeDefaults) -> Result<(), StorageError>;
    /// Drop every persisted day and the defaults.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<P: DayPersistence + ?Sized> DayPersistence for Box<P> {
    fn read_all(&self) -> Result<Vec<DayRecord>, StorageError> {
        (**self).read_all()
    }

    fn write_all(&self, days: &[DayRecord]) -> Result<(), StorageError> {
        (**self).write_all(days)
    }

    fn read_defaults(&self) -> Result<TimeDefaults, StorageError> {
        (**self).read_defaults()
    }

    fn write_defaults(&self, defaults: &TimeDefaults) -> Result<(), StorageError> {
        (**self).write_defaults(defaults)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Open the backend selected in `config` under [`data_dir`].
pub fn open_port(config: &Config) -> crate::Result<Box<dyn DayPersistence>> {
    let port: Box<dyn DayPersistence> = match config.storage.backend {
        StorageBackend::Sqlite => Box::new(Database::open()?),
        StorageBackend::Json => {
            Box::new(JsonFileStore::new(data_dir()?.join(json_file::DAYS_FILE)))
        }
    };
    Ok(port)
}

/// Returns `~/.config/fifteen[-dev]/` based on FIFTEEN_ENV.
///
/// Set FIFTEEN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FIFTEEN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("fifteen-dev")
    } else {
        base_dir.join("fifteen")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
