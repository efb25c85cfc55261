//! Day model: labels, fixed-length blocks and per-date records.
//!
//! A [`DayRecord`] owns the ordered blocks between a wake and a sleep
//! instant. Blocks are produced by [`partition`] and only ever mutated
//! through label assignment in [`DayStore`].

mod events;
mod partition;
mod store;

pub use events::{DayEvent, SubscriptionId};
pub use partition::{block_count, partition, DEFAULT_SLICE_MINUTES};
pub use store::DayStore;

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Activity category a user assigns to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Productive,
    Life,
    Unproductive,
}

impl Label {
    /// All labels in declaration order.
    pub const ALL: [Label; 3] = [Label::Productive, Label::Life, Label::Unproductive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Productive => "productive",
            Label::Life => "life",
            Label::Unproductive => "unproductive",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Productive => "Productive",
            Label::Life => "Life",
            Label::Unproductive => "Unproductive",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "productive" => Ok(Label::Productive),
            "life" => Ok(Label::Life),
            "unproductive" => Ok(Label::Unproductive),
            other => Err(ValidationError::InvalidValue {
                field: "label".to_string(),
                message: format!("'{other}' is not one of productive, life, unproductive"),
            }),
        }
    }
}

/// Label state of a block. `Unset` marks the block as incomplete.
///
/// Serialized as `null` or the label string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Label>", into = "Option<Label>")]
pub enum Slot {
    #[default]
    Unset,
    Labeled(Label),
}

impl Slot {
    pub fn label(&self) -> Option<Label> {
        match self {
            Slot::Unset => None,
            Slot::Labeled(label) => Some(*label),
        }
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Slot::Labeled(_))
    }
}

impl From<Option<Label>> for Slot {
    fn from(value: Option<Label>) -> Self {
        value.map_or(Slot::Unset, Slot::Labeled)
    }
}

impl From<Slot> for Option<Label> {
    fn from(value: Slot) -> Self {
        value.label()
    }
}

impl From<Label> for Slot {
    fn from(value: Label) -> Self {
        Slot::Labeled(value)
    }
}

/// One fixed-length interval `[start, end)` of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub slot: Slot,
}

impl Block {
    /// Create an unlabeled block with a fresh identity.
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            end_time,
            slot: Slot::Unset,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn label(&self) -> Option<Label> {
        self.slot.label()
    }

    pub fn is_completed(&self) -> bool {
        self.slot.is_labeled()
    }

    /// `"07:00–07:15"`
    pub fn time_range(&self) -> String {
        format!(
            "{}\u{2013}{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// All blocks of one calendar date plus that date's wake/sleep bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub wake_time: NaiveDateTime,
    pub sleep_time: NaiveDateTime,
    pub blocks: Vec<Block>,
}

impl DayRecord {
    pub fn new(
        date: NaiveDate,
        wake_time: NaiveDateTime,
        sleep_time: NaiveDateTime,
        blocks: Vec<Block>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            wake_time,
            sleep_time,
            blocks,
        }
    }

    /// Position of a block in chronological order.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_completed()).count()
    }

    /// Completed blocks over total blocks, `0.0` for an empty day.
    pub fn completion_ratio(&self) -> f64 {
        if self.blocks.is_empty() {
            0.0
        } else {
            self.completed_count() as f64 / self.blocks.len() as f64
        }
    }

    /// Share of blocks carrying `label`, in percent.
    pub fn percentage(&self, label: Label) -> f64 {
        if self.blocks.is_empty() {
            return 0.0;
        }
        let count = self
            .blocks
            .iter()
            .filter(|b| b.label() == Some(label))
            .count();
        count as f64 / self.blocks.len() as f64 * 100.0
    }

    pub fn summary(&self) -> DaySummary {
        DaySummary {
            date: self.date,
            total_blocks: self.blocks.len(),
            completed_blocks: self.completed_count(),
            productive_pct: self.percentage(Label::Productive),
            life_pct: self.percentage(Label::Life),
            unproductive_pct: self.percentage(Label::Unproductive),
        }
    }
}

/// Aggregate view of a day, as shown in the daily summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_blocks: usize,
    pub completed_blocks: usize,
    pub productive_pct: f64,
    pub life_pct: f64,
    pub unproductive_pct: f64,
}
