//! Single-file JSON storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{DayPersistence, TimeDefaults};
use crate::day::DayRecord;
use crate::error::StorageError;

/// File name used under the data directory.
pub const DAYS_FILE: &str = "days.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DaysFile {
    #[serde(default)]
    defaults: TimeDefaults,
    #[serde(default)]
    saved_days: Vec<DayRecord>,
}

/// Keeps the whole collection and the defaults in one pretty-printed file.
/// A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<DaysFile, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Serialize {
                    key: self.path.display().to_string(),
                    source,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DaysFile::default()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Current file contents as the base for a write. An undecodable file
    /// is replaced rather than blocking every later write.
    fn load_for_write(&self) -> Result<DaysFile, StorageError> {
        match self.load() {
            Err(StorageError::Serialize { source, .. }) => {
                warn!(
                    path = %self.path.display(),
                    error = %source,
                    "replacing unreadable days file"
                );
                Ok(DaysFile::default())
            }
            other => other,
        }
    }

    fn save(&self, file: &DaysFile) -> Result<(), StorageError> {
        let content =
            serde_json::to_string_pretty(file).map_err(|source| StorageError::Serialize {
                key: self.path.display().to_string(),
                source,
            })?;
        std::fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }
}

impl DayPersistence for JsonFileStore {
    fn read_all(&self) -> Result<Vec<DayRecord>, StorageError> {
        Ok(self.load()?.saved_days)
    }

    fn write_all(&self, days: &[DayRecord]) -> Result<(), StorageError> {
        let mut file = self.load_for_write()?;
        file.saved_days = days.to_vec();
        self.save(&file)
    }

    fn read_defaults(&self) -> Result<TimeDefaults, StorageError> {
        Ok(self.load()?.defaults)
    }

    fn write_defaults(&self, defaults: &TimeDefaults) -> Result<(), StorageError> {
        let mut file = self.load_for_write()?;
        file.defaults = *defaults;
        self.save(&file)
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::day::{partition, Label, Slot};

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(DAYS_FILE));
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.read_defaults().unwrap(), TimeDefaults::default());
    }

    #[test]
    fn days_and_defaults_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(DAYS_FILE));

        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        let wake = date.and_hms_opt(6, 0, 0).unwrap();
        let sleep = date.and_hms_opt(7, 0, 0).unwrap();
        let mut blocks = partition(wake, sleep, Duration::minutes(15));
        blocks[0].slot = Slot::Labeled(Label::Productive);
        let day = DayRecord::new(date, wake, sleep, blocks);

        store.write_all(std::slice::from_ref(&day)).unwrap();
        store
            .write_defaults(&TimeDefaults {
                wake: Some(wake),
                sleep: Some(sleep),
            })
            .unwrap();

        assert_eq!(store.read_all().unwrap(), vec![day]);
        assert_eq!(store.read_defaults().unwrap().sleep, Some(sleep));
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DAYS_FILE);
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(store.read_all().is_err());
    }

    #[test]
    fn write_replaces_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DAYS_FILE);
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(path);

        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let wake = date.and_hms_opt(6, 0, 0).unwrap();
        let sleep = date.and_hms_opt(6, 30, 0).unwrap();
        let day = DayRecord::new(date, wake, sleep, partition(wake, sleep, Duration::minutes(15)));

        store.write_all(std::slice::from_ref(&day)).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![day]);
        assert_eq!(store.read_defaults().unwrap(), TimeDefaults::default());
    }

    #[test]
    fn clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(DAYS_FILE));
        store.write_all(&[]).unwrap();
        assert!(store.path().exists());
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }
}
