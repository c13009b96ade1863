use crate::error::BackoffError;
use crate::record::PersistentBackoffRecord;
use crate::table::BackoffTable;
use std::time::Duration;
use tracing::debug;

/// Failure counter bound to one caller-owned record and one table.
///
/// Every public operation validates the record first. An uninitialized or
/// corrupt record is silently reset to a valid record with a zero counter.
///
/// ```
/// use backoff_core::{BackoffState, PersistentBackoffRecord};
///
/// let mut record = PersistentBackoffRecord::default();
/// let mut backoff = BackoffState::new(&mut record);
/// assert_eq!(backoff.record_failure_and_get_wait_secs(), 5 * 60);
/// assert_eq!(backoff.record_failure_and_get_wait_secs(), 10 * 60);
/// backoff.record_success();
/// assert_eq!(backoff.tries_count(), 0);
/// ```
#[derive(Debug)]
pub struct BackoffState<'a> {
    record: &'a mut PersistentBackoffRecord,
    table: BackoffTable<'a>,
}

impl<'a> BackoffState<'a> {
    pub fn new(record: &'a mut PersistentBackoffRecord) -> Self {
        Self::with_table(record, BackoffTable::DEFAULT)
    }

    pub fn with_table(record: &'a mut PersistentBackoffRecord, table: BackoffTable<'a>) -> Self {
        Self { record, table }
    }

    /// Attaches a custom table. On error the current table stays attached.
    pub fn configure(&mut self, minutes: &'a [u8]) -> Result<&mut Self, BackoffError> {
        self.table = BackoffTable::new(minutes)?;
        Ok(self)
    }

    pub fn reset_to_default_table(&mut self) -> &mut Self {
        self.table = BackoffTable::DEFAULT;
        self
    }

    pub fn table(&self) -> BackoffTable<'a> {
        self.table
    }

    pub fn record_success(&mut self) {
        self.validate();
        self.record.tries = 0;
    }

    /// Returns the wait for the current failure count, then counts this
    /// failure. The first failure after a success gets the first entry.
    pub fn record_failure_and_get_wait_secs(&mut self) -> u32 {
        self.validate();
        let wait_secs = self.table.wait_secs_for(self.record.tries);
        self.record.tries = self.record.tries.saturating_add(1);
        wait_secs
    }

    pub fn record_failure(&mut self) -> Duration {
        Duration::from_secs(u64::from(self.record_failure_and_get_wait_secs()))
    }

    pub fn tries_count(&mut self) -> u16 {
        self.validate();
        self.record.tries
    }

    /// Wait the next failure would return, without touching the record.
    /// An invalid record reads as zero tries.
    pub fn peek_wait_secs(&self) -> u32 {
        let tries = if self.record.is_valid() {
            self.record.tries
        } else {
            0
        };
        self.table.wait_secs_for(tries)
    }

    /// Resets the record when its tag or version is wrong. Returns true when
    /// a reset happened.
    pub fn validate(&mut self) -> bool {
        if self.record.is_valid() {
            return false;
        }
        debug!(
            magic = self.record.magic,
            version = self.record.version,
            "retained backoff record invalid; resetting"
        );
        self.record.heal();
        true
    }
}
