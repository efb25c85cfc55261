//! # fifteen Core Library
//!
//! Core logic for documenting a day in fixed 15-minute increments. The
//! waking span between a wake and a sleep time is cut into equal blocks,
//! and each block is labeled productive, life or unproductive.
//!
//! ## Architecture
//!
//! - **Partitioning**: [`partition`] is a pure function from wake, sleep and
//!   slice length to an ordered list of [`Block`]s
//! - **Day store**: [`DayStore`] holds one [`DayRecord`] per calendar date,
//!   applies label changes and notifies subscribers synchronously
//! - **Storage**: the [`DayPersistence`] port with SQLite, JSON-file and
//!   in-memory backends, plus TOML configuration
//!
//! The store is single-threaded and never fails towards its caller:
//! persistence errors are logged through `tracing` and absorbed.

pub mod clock;
pub mod day;
pub mod error;
pub mod setup;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use day::{
    block_count, partition, Block, DayEvent, DayRecord, DayStore, DaySummary, Label, Slot,
    SubscriptionId, DEFAULT_SLICE_MINUTES,
};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use storage::{
    Config, Database, DayPersistence, JsonFileStore, MemoryStore, StorageBackend, TimeDefaults,
};
