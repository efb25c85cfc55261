//! In-process persistence port.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{DayPersistence, TimeDefaults};
use crate::day::DayRecord;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    days: RefCell<Vec<DayRecord>>,
    defaults: Cell<TimeDefaults>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

/// Cloneable handle over shared in-memory state.
///
/// Clones see the same data, so a store can be dropped and reopened over
/// a clone to simulate a restart. Reads and writes can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.set(fail);
    }

    /// Number of successful `write_all` calls.
    pub fn write_count(&self) -> usize {
        self.inner.writes.get()
    }

    /// Snapshot of the persisted collection.
    pub fn snapshot(&self) -> Vec<DayRecord> {
        self.inner.days.borrow().clone()
    }

    fn check_read(&self) -> Result<(), StorageError> {
        if self.inner.fail_reads.get() {
            return Err(StorageError::QueryFailed("simulated read failure".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StorageError> {
        if self.inner.fail_writes.get() {
            return Err(StorageError::QueryFailed("simulated write failure".into()));
        }
        Ok(())
    }
}

impl DayPersistence for MemoryStore {
    fn read_all(&self) -> Result<Vec<DayRecord>, StorageError> {
        self.check_read()?;
        Ok(self.snapshot())
    }

    fn write_all(&self, days: &[DayRecord]) -> Result<(), StorageError> {
        self.check_write()?;
        *self.inner.days.borrow_mut() = days.to_vec();
        self.inner.writes.set(self.inner.writes.get() + 1);
        Ok(())
    }

    fn read_defaults(&self) -> Result<TimeDefaults, StorageError> {
        self.check_read()?;
        Ok(self.inner.defaults.get())
    }

    fn write_defaults(&self, defaults: &TimeDefaults) -> Result<(), StorageError> {
        self.check_write()?;
        self.inner.defaults.set(*defaults);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.check_write()?;
        self.inner.days.borrow_mut().clear();
        self.inner.defaults.set(TimeDefaults::default());
        Ok(())
    }
}
