pub mod block;
pub mod config;
pub mod day;
pub mod setup;

use chrono::NaiveDate;
use fifteen_core::storage::open_port;
use fifteen_core::{Config, DayStore, SystemClock};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store over the configured backend.
pub fn open_store(config: &Config) -> Result<DayStore, Box<dyn std::error::Error>> {
    tracing::debug!(backend = ?config.storage.backend, "opening store");
    let port = open_port(config)?;
    Ok(DayStore::open(port, SystemClock, config.slice_length()))
}

/// Parse `YYYY-MM-DD`, or today when absent.
pub fn parse_date(
    store: &DayStore,
    date: Option<&str>,
) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(raw) => Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{raw}': {e}"))?),
        None => Ok(store.today()),
    }
}
