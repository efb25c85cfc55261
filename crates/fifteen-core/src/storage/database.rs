//! SQLite-backed key-value storage for day records.
//!
//! Everything lives in a single `kv` table as JSON values:
//! - `saved_days`: the full day collection, ordered by date
//! - `wake_time` / `sleep_time`: the global defaults

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{data_dir, DayPersistence, TimeDefaults};
use crate::day::DayRecord;
use crate::error::StorageError;

const SAVED_DAYS_KEY: &str = "saved_days";
const WAKE_TIME_KEY: &str = "wake_time";
const SLEEP_TIME_KEY: &str = "sleep_time";

/// SQLite database holding the day collection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/fifteen/fifteen.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> crate::Result<Self> {
        let path = data_dir()?.join("fifteen.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Serialize {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.kv_set(key, &raw)?;
        Ok(())
    }
}

impl DayPersistence for Database {
    fn read_all(&self) -> Result<Vec<DayRecord>, StorageError> {
        Ok(self.get_json(SAVED_DAYS_KEY)?.unwrap_or_default())
    }

    fn write_all(&self, days: &[DayRecord]) -> Result<(), StorageError> {
        self.set_json(SAVED_DAYS_KEY, days)
    }

    fn read_defaults(&self) -> Result<TimeDefaults, StorageError> {
        Ok(TimeDefaults {
            wake: self.get_json(WAKE_TIME_KEY)?,
            sleep: self.get_json(SLEEP_TIME_KEY)?,
        })
    }

    fn write_defaults(&self, defaults: &TimeDefaults) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in [(WAKE_TIME_KEY, defaults.wake), (SLEEP_TIME_KEY, defaults.sleep)] {
            match value {
                Some(at) => self.set_json(key, &at)?,
                None => self.kv_delete(key)?,
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM kv WHERE key IN (?1, ?2, ?3)",
            params![SAVED_DAYS_KEY, WAKE_TIME_KEY, SLEEP_TIME_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::day::{partition, Label, Slot};

    fn sample_day() -> DayRecord {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let wake = date.and_hms_opt(7, 0, 0).unwrap();
        let sleep = date.and_hms_opt(9, 0, 0).unwrap();
        let mut blocks = partition(wake, sleep, Duration::minutes(15));
        blocks[2].slot = Slot::Labeled(Label::Unproductive);
        DayRecord::new(date, wake, sleep, blocks)
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn empty_database_reads_empty() {
        let db = Database::open_memory().unwrap();
        assert!(db.read_all().unwrap().is_empty());
        assert_eq!(db.read_defaults().unwrap(), TimeDefaults::default());
    }

    #[test]
    fn days_survive_write_and_read() {
        let db = Database::open_memory().unwrap();
        let day = sample_day();
        db.write_all(std::slice::from_ref(&day)).unwrap();
        assert_eq!(db.read_all().unwrap(), vec![day]);
    }

    #[test]
    fn defaults_can_be_partially_set() {
        let db = Database::open_memory().unwrap();
        let wake = sample_day().wake_time;
        db.write_defaults(&TimeDefaults {
            wake: Some(wake),
            sleep: None,
        })
        .unwrap();
        let read = db.read_defaults().unwrap();
        assert_eq!(read.wake, Some(wake));
        assert_eq!(read.sleep, None);
    }

    #[test]
    fn corrupt_value_is_a_serialize_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set(SAVED_DAYS_KEY, "{not json").unwrap();
        assert!(matches!(db.read_all(), Err(StorageError::Serialize { .. })));
    }

    #[test]
    fn clear_drops_days_and_defaults() {
        let db = Database::open_memory().unwrap();
        db.write_all(&[sample_day()]).unwrap();
        db.write_defaults(&TimeDefaults {
            wake: Some(sample_day().wake_time),
            sleep: Some(sample_day().sleep_time),
        })
        .unwrap();
        db.clear().unwrap();
        assert!(db.read_all().unwrap().is_empty());
        assert_eq!(db.read_defaults().unwrap(), TimeDefaults::default());
    }
}
