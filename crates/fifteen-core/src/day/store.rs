//! Authoritative holder of all day records.
//!
//! Every mutation is written through the persistence port right away.
//! Port failures are logged and absorbed: the in-memory state always
//! reflects the mutation, and a failed read starts from an empty collection.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use super::events::{DayEvent, SubscriptionId};
use super::partition::{partition, DEFAULT_SLICE_MINUTES};
use super::{DayRecord, Label, Slot};
use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::setup::validate_bounds;
use crate::storage::{DayPersistence, TimeDefaults};

type Observer = Box<dyn FnMut(&DayEvent, Option<&DayRecord>)>;

pub struct DayStore {
    port: Box<dyn DayPersistence>,
    clock: Box<dyn Clock>,
    slice: Duration,
    days: HashMap<NaiveDate, DayRecord>,
    defaults: TimeDefaults,
    /// Date of the active record. Always a key of `days` when set.
    active: Option<NaiveDate>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl DayStore {
    /// Create an empty store without reading the port.
    pub fn new(
        port: impl DayPersistence + 'static,
        clock: impl Clock + 'static,
        slice: Duration,
    ) -> Self {
        Self {
            port: Box::new(port),
            clock: Box::new(clock),
            slice,
            days: HashMap::new(),
            defaults: TimeDefaults::default(),
            active: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and immediately [`reload`](Self::reload) it.
    pub fn open(
        port: impl DayPersistence + 'static,
        clock: impl Clock + 'static,
        slice: Duration,
    ) -> Self {
        let mut store = Self::new(port, clock, slice);
        store.reload();
        store
    }

    /// Open with the system clock and the default 15 minute slice.
    pub fn with_defaults(port: impl DayPersistence + 'static) -> Self {
        Self::open(port, SystemClock, Duration::minutes(DEFAULT_SLICE_MINUTES))
    }

    // -- accessors ---------------------------------------------------------

    /// The active record, if any.
    pub fn current_day(&self) -> Option<&DayRecord> {
        self.active.and_then(|date| self.days.get(&date))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    /// All records in chronological order.
    pub fn days(&self) -> Vec<&DayRecord> {
        let mut days: Vec<_> = self.days.values().collect();
        days.sort_by_key(|d| d.date);
        days
    }

    pub fn wake_time(&self) -> Option<NaiveDateTime> {
        self.defaults.wake
    }

    pub fn sleep_time(&self) -> Option<NaiveDateTime> {
        self.defaults.sleep
    }

    pub fn slice_length(&self) -> Duration {
        self.slice
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // -- observers ---------------------------------------------------------

    /// Register a callback fired after every state-changing operation.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&DayEvent, Option<&DayRecord>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: DayEvent) {
        let current = self.active.and_then(|date| self.days.get(&date));
        for (_, observer) in self.observers.iter_mut() {
            observer(&event, current);
        }
    }

    // -- wake / sleep ------------------------------------------------------

    /// Record the wake default. Regenerates today's blocks once both
    /// defaults are known, discarding today's labels.
    pub fn set_wake_time(&mut self, at: NaiveDateTime) {
        self.defaults.wake = Some(at);
        self.write_defaults();
        self.notify(DayEvent::WakeTimeSet { at });
        if self.defaults.sleep.is_some() {
            let today = self.clock.today();
            self.generate(today);
        }
    }

    /// Record the sleep default. Same regeneration rule as
    /// [`set_wake_time`](Self::set_wake_time).
    pub fn set_sleep_time(&mut self, at: NaiveDateTime) {
        self.defaults.sleep = Some(at);
        self.write_defaults();
        self.notify(DayEvent::SleepTimeSet { at });
        if self.defaults.wake.is_some() {
            let today = self.clock.today();
            self.generate(today);
        }
    }

    /// Validate a wake/sleep pair, then apply both with a single defaults
    /// write and a single regeneration of today.
    pub fn configure(
        &mut self,
        wake: NaiveDateTime,
        sleep: NaiveDateTime,
    ) -> Result<(), ValidationError> {
        validate_bounds(wake, sleep)?;
        self.defaults = TimeDefaults {
            wake: Some(wake),
            sleep: Some(sleep),
        };
        self.write_defaults();
        self.notify(DayEvent::WakeTimeSet { at: wake });
        self.notify(DayEvent::SleepTimeSet { at: sleep });
        let today = self.clock.today();
        self.generate(today);
        Ok(())
    }

    /// Wake/sleep bounds on `date`: the wake default's time of day on that
    /// date, and the same span as the defaults.
    fn bounds_on(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (wake, sleep) = (self.defaults.wake?, self.defaults.sleep?);
        let wake_on = date.and_time(wake.time());
        let sleep_on = wake_on.checked_add_signed(sleep - wake)?;
        Some((wake_on, sleep_on))
    }

    /// Build a fresh record for `date` from the defaults and make it active.
    fn generate(&mut self, date: NaiveDate) -> bool {
        let Some((wake, sleep)) = self.bounds_on(date) else {
            return false;
        };
        if wake >= sleep {
            warn!(%date, %wake, %sleep, "wake time is not before sleep time, no blocks generated");
            return false;
        }

        let blocks = partition(wake, sleep, self.slice);
        let count = blocks.len();
        self.days.insert(date, DayRecord::new(date, wake, sleep, blocks));
        self.active = Some(date);
        debug!(%date, blocks = count, "generated day");
        self.persist();
        self.notify(DayEvent::DayGenerated {
            date,
            blocks: count,
        });
        true
    }

    // -- navigation --------------------------------------------------------

    /// Make `date` the active day, synthesizing it from the defaults if the
    /// store has no record for it. No-op without defaults.
    pub fn load_day(&mut self, date: NaiveDate) {
        if self.days.contains_key(&date) {
            self.active = Some(date);
            debug!(%date, "loaded day");
            self.notify(DayEvent::DayLoaded { date });
        } else if !self.generate(date) {
            debug!(%date, "no record and no usable defaults, active day unchanged");
        }
    }

    // -- labels ------------------------------------------------------------

    /// Label a block of the active day. No-op if there is no active day or
    /// the block is not part of it.
    pub fn set_label(&mut self, block_id: Uuid, label: Label) {
        let slot = Slot::Labeled(label);
        let Some(date) = self.update_block(block_id, |_| Some(slot)) else {
            return;
        };
        self.persist();
        self.notify(DayEvent::LabelSet {
            date,
            block_id,
            slot,
        });
    }

    /// Give a block the label of the block right before it, including
    /// `Unset`. No-op for the first block, an unknown block, or no active day.
    pub fn copy_previous_label(&mut self, block_id: Uuid) {
        let mut copied = Slot::Unset;
        let Some(date) = self.update_block(block_id, |prev| {
            copied = prev?;
            Some(copied)
        }) else {
            return;
        };
        self.persist();
        self.notify(DayEvent::LabelCopied {
            date,
            block_id,
            slot: copied,
        });
    }

    /// Locate `block_id` in the active day and replace its slot with what
    /// `f` returns. `f` gets the previous block's slot, `None` for the first
    /// block; returning `None` leaves the block untouched. Yields the day's
    /// date when the block changed.
    fn update_block(
        &mut self,
        block_id: Uuid,
        f: impl FnOnce(Option<Slot>) -> Option<Slot>,
    ) -> Option<NaiveDate> {
        let date = self.active?;
        let day = self.days.get_mut(&date)?;
        let index = day.position(block_id)?;
        let prev = index.checked_sub(1).map(|i| day.blocks[i].slot);
        day.blocks[index].slot = f(prev)?;
        Some(date)
    }

    // -- persistence -------------------------------------------------------

    fn persist(&self) {
        let mut days: Vec<DayRecord> = self.days.values().cloned().collect();
        days.sort_by_key(|d| d.date);
        if let Err(e) = self.port.write_all(&days) {
            warn!(error = %e, "failed to persist days, keeping in-memory state");
        }
    }

    fn write_defaults(&self) {
        if let Err(e) = self.port.write_defaults(&self.defaults) {
            warn!(error = %e, "failed to persist wake/sleep defaults");
        }
    }

    /// Replace in-memory state with what the port holds and activate
    /// today's record if there is one.
    pub fn reload(&mut self) {
        self.days = match self.port.read_all() {
            Ok(records) => records.into_iter().map(|d| (d.date, d)).collect(),
            Err(e) => {
                warn!(error = %e, "failed to read days, starting empty");
                HashMap::new()
            }
        };
        self.defaults = match self.port.read_defaults() {
            Ok(defaults) => defaults,
            Err(e) => {
                warn!(error = %e, "failed to read wake/sleep defaults");
                TimeDefaults::default()
            }
        };

        let today = self.clock.today();
        self.active = self.days.contains_key(&today).then_some(today);
        debug!(days = self.days.len(), active = ?self.active, "reloaded store");
        let days = self.days.len();
        self.notify(DayEvent::Reloaded { days });
    }
}
