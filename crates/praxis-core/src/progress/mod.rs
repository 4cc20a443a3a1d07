//! Progress ledger: day pointer and completed-day bookkeeping.
//!
//! Tracks, per (user, topic), which day to serve next and which days are
//! fully done, independently for each topic. All mutations go through the
//! injected store as single atomic operations; the ledger itself never
//! reads then writes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, StoreError};
use crate::key::LedgerKey;
use crate::program::{self, TopicId, DAYS_PER_TOPIC, MIN_DAY, TOPIC_COUNT};

/// Per-key progress state.
///
/// `current_day` and `completed_days` are independently settable: the
/// intended coupling `current_day = min(28, max(completed_days) + 1)` is
/// what `complete_day` produces, but `set_day` can move the pointer
/// anywhere without touching the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current_day: u32,
    pub started: bool,
    pub completed_days: BTreeSet<u32>,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            current_day: MIN_DAY,
            started: false,
            completed_days: BTreeSet::new(),
        }
    }
}

impl ProgressSnapshot {
    pub fn completed_count(&self) -> u32 {
        self.completed_days.len() as u32
    }

    /// Share of the 28 days completed, as a percentage with one decimal.
    pub fn topic_percent(&self) -> f64 {
        percent(self.completed_count(), DAYS_PER_TOPIC)
    }
}

/// Store primitives the ledger needs.
pub trait ProgressStore {
    /// find-one-by-key; `None` when no record exists (distinct from a
    /// record with an empty completed set).
    fn find_progress(&self, key: &LedgerKey) -> Result<Option<ProgressSnapshot>, StoreError>;

    /// Atomic upsert setting `current_day` and `started = true`, creating
    /// the record if absent and preserving the completed set otherwise.
    fn upsert_day(&self, key: &LedgerKey, day: u32) -> Result<(), StoreError>;

    /// Atomic add-to-set-and-set-field: add `day` to the completed set and
    /// move the pointer to `next_day`, creating the record with defaults
    /// if absent. `started` is left untouched.
    fn add_completed_day(&self, key: &LedgerKey, day: u32, next_day: u32)
        -> Result<(), StoreError>;

    /// count-by-filter: completed-day counts per topic for one user.
    fn completed_counts(&self, user_id: &str) -> Result<BTreeMap<TopicId, u32>, StoreError>;
}

/// Per-topic slice of a user summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic_id: TopicId,
    pub completed_days: u32,
    pub percent: f64,
}

/// Raw per-user counts across all topics; no user-facing text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    pub topics: Vec<TopicSummary>,
    pub completed_days: u32,
    pub total_days: u32,
    pub overall_percent: f64,
}

/// Progress ledger over an injected store.
pub struct ProgressLedger<'a> {
    store: &'a dyn ProgressStore,
}

impl<'a> ProgressLedger<'a> {
    pub fn new(store: &'a dyn ProgressStore) -> Self {
        Self { store }
    }

    /// Progress for a key, defaulting to day 1 / not started / empty set.
    /// Never creates a record as a side effect of reading.
    pub fn get_progress(&self, key: &LedgerKey) -> Result<ProgressSnapshot> {
        Ok(self.store.find_progress(key)?.unwrap_or_default())
    }

    /// Like [`get_progress`](Self::get_progress), but absence is explicit,
    /// so callers can tell a never-started topic from a reset one.
    pub fn find_progress(&self, key: &LedgerKey) -> Result<Option<ProgressSnapshot>> {
        Ok(self.store.find_progress(key)?)
    }

    /// Set the day pointer, clamping into `1..=28`, and mark the topic
    /// started. Returns the clamped value so callers use the effective day.
    pub fn set_day(&self, key: &LedgerKey, day: i64) -> Result<u32> {
        let day = program::clamp_day(day);
        self.store.upsert_day(key, day)?;
        Ok(day)
    }

    /// Mark `day` completed and advance the pointer to `min(day + 1, 28)`.
    ///
    /// Out-of-range days are rejected with `InvalidDay`, never clamped.
    /// Re-completing an already-completed day succeeds and is a no-op on
    /// the set; the pointer is still advanced.
    pub fn complete_day(&self, key: &LedgerKey, day: u32) -> Result<()> {
        if !(MIN_DAY..=DAYS_PER_TOPIC).contains(&day) {
            return Err(CoreError::InvalidDay { day });
        }
        let next_day = (day + 1).min(DAYS_PER_TOPIC);
        self.store.add_completed_day(key, day, next_day)?;
        Ok(())
    }

    /// Per-topic counts and percentages plus the overall percentage for
    /// one user, computed from a single count-by-filter store call.
    pub fn user_summary(&self, user_id: &str) -> Result<UserSummary> {
        let counts = self.store.completed_counts(user_id)?;
        let topics: Vec<TopicSummary> = TopicId::all()
            .map(|topic_id| {
                let completed_days = counts.get(&topic_id).copied().unwrap_or(0);
                TopicSummary {
                    topic_id,
                    completed_days,
                    percent: percent(completed_days, DAYS_PER_TOPIC),
                }
            })
            .collect();
        let completed_days: u32 = topics.iter().map(|t| t.completed_days).sum();
        let total_days = DAYS_PER_TOPIC * u32::from(TOPIC_COUNT);
        Ok(UserSummary {
            user_id: user_id.to_string(),
            topics,
            completed_days,
            total_days,
            overall_percent: percent(completed_days, total_days),
        })
    }
}

/// `100 * completed / total`, rounded to one decimal place.
fn percent(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(completed) * 1000.0 / f64::from(total)).round() / 10.0
}
