use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Slot;

/// Every state change in a [`super::DayStore`] produces a DayEvent.
/// Observers receive it synchronously, together with the active record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DayEvent {
    /// The global wake default changed.
    WakeTimeSet { at: NaiveDateTime },
    /// The global sleep default changed.
    SleepTimeSet { at: NaiveDateTime },
    /// A day's blocks were rebuilt from the wake/sleep defaults.
    /// Any labels previously held for that date are gone.
    DayGenerated { date: NaiveDate, blocks: usize },
    /// An existing record became the active one.
    DayLoaded { date: NaiveDate },
    /// A block's label changed.
    LabelSet {
        date: NaiveDate,
        block_id: Uuid,
        slot: Slot,
    },
    /// A block took over its predecessor's label.
    LabelCopied {
        date: NaiveDate,
        block_id: Uuid,
        slot: Slot,
    },
    /// The collection was read back from the persistence port.
    Reloaded { days: usize },
}

/// Handle returned by [`super::DayStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);
