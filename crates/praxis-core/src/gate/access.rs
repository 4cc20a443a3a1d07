//! Daily access gate.
//!
//! Enforces at most one fresh content serve per (user, topic) per daily
//! window. The gate owns no connection of its own; a store handle and a
//! [`ResetClock`] are injected at construction, and `now` is always a
//! parameter so callers control the time source.
//!
//! Store failures propagate as errors and are fail-closed: a ledger that
//! cannot be read never counts as an open gate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::reset_clock::ResetClock;
use crate::error::{Result, StoreError};
use crate::key::LedgerKey;

/// One entry of the access ledger.
///
/// `next_reset_at` is always the smallest boundary strictly greater than
/// `last_access_at`. Entries are created and overwritten by
/// [`AccessGate::record_access`] only; reads never create them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub last_access_at: DateTime<Utc>,
    pub last_access_day: u32,
    pub next_reset_at: DateTime<Utc>,
}

/// Store primitives the gate needs: find-one, atomic upsert, delete.
pub trait AccessStore {
    fn find_access(&self, key: &LedgerKey) -> Result<Option<AccessRecord>, StoreError>;

    /// Upsert the whole record in a single atomic operation.
    fn upsert_access(&self, key: &LedgerKey, record: &AccessRecord) -> Result<(), StoreError>;

    fn delete_access(&self, key: &LedgerKey) -> Result<(), StoreError>;
}

/// Outcome of an access check. `next_reset_at` is carried in both branches
/// so callers can always show when the window turns over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub open: bool,
    pub next_reset_at: DateTime<Utc>,
}

/// Daily unlock gate over an injected store and reset clock.
pub struct AccessGate<'a> {
    store: &'a dyn AccessStore,
    clock: ResetClock,
}

impl<'a> AccessGate<'a> {
    pub fn new(store: &'a dyn AccessStore, clock: ResetClock) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &ResetClock {
        &self.clock
    }

    /// Whether a fresh serve is allowed at `now`.
    ///
    /// Open when no record exists, or when the last access predates the
    /// current window boundary. An instant exactly on the boundary belongs
    /// to the new window.
    pub fn has_access(&self, key: &LedgerKey, now: DateTime<Utc>) -> Result<AccessDecision> {
        let next_reset_at = self.clock.next_boundary(now);
        let open = match self.store.find_access(key)? {
            None => true,
            Some(record) => record.last_access_at < self.clock.current_boundary(now),
        };
        Ok(AccessDecision { open, next_reset_at })
    }

    /// Record that `day` was served at `now`. Idempotent for equal `now`.
    pub fn record_access(
        &self,
        key: &LedgerKey,
        day: u32,
        now: DateTime<Utc>,
    ) -> Result<AccessRecord> {
        let record = AccessRecord {
            last_access_at: now,
            last_access_day: day,
            next_reset_at: self.clock.next_boundary(now),
        };
        self.store.upsert_access(key, &record)?;
        Ok(record)
    }

    /// Time until the gate reopens; zero when it is already open.
    pub fn remaining_time(&self, key: &LedgerKey, now: DateTime<Utc>) -> Result<Duration> {
        let decision = self.has_access(key, now)?;
        if decision.open {
            return Ok(Duration::zero());
        }
        Ok((decision.next_reset_at - now).max(Duration::zero()))
    }

    /// Delete the access record, restoring immediate access.
    /// Administrative/test use only; not part of the normal user flow.
    pub fn reset(&self, key: &LedgerKey) -> Result<()> {
        self.store.delete_access(key)?;
        Ok(())
    }
}
