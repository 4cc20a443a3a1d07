//! Unlock orchestration: gate + ledger composed for callers.
//!
//! A transport layer asks [`Unlock`] what the current situation is for a
//! key and acts on the answer. The orchestrator itself is thin; all real
//! state lives in the two ledgers.
//!
//! ```text
//! Locked ──boundary crossing──▶ Servable ──record_access──▶ Locked
//!                                  │
//!                                  └──complete_day──▶ (pointer advances)
//! ```
//!
//! A brand-new key is servable at day 1. There is no terminal state: day
//! 28 simply stops advancing the pointer, and the key keeps cycling
//! between locked and servable forever.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::gate::AccessGate;
use crate::key::LedgerKey;
use crate::program::{day_in_week, week_number, TopicId};
use crate::progress::{ProgressLedger, ProgressSnapshot};

/// Content for a single day, as supplied by an external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContent {
    pub title: String,
    pub intro: String,
    pub items: Vec<String>,
    pub exercise: String,
}

/// External content lookup by (topic, week, day-in-week) coordinates.
/// `None` is the explicit not-found signal; the core never authors or
/// stores this text.
pub trait ContentCatalog {
    fn day_content(
        &self,
        topic_id: TopicId,
        week_number: u32,
        day_in_week: u32,
    ) -> Option<DayContent>;
}

/// Classification of the current situation for a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UnlockOutcome {
    /// Content for `day` may be served now.
    Servable {
        day: u32,
        week_number: u32,
        day_in_week: u32,
    },
    /// The gate is closed and the previous day is already completed;
    /// nothing to do until the next boundary.
    AlreadyDoneToday {
        day: u32,
        next_reset_at: DateTime<Utc>,
        remaining_secs: i64,
    },
}

/// A successfully served day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Served {
    pub day: u32,
    pub week_number: u32,
    pub day_in_week: u32,
    pub content: DayContent,
    /// True when the served day is already in the completed set (the gate
    /// re-serves the same day until it is completed).
    pub already_completed: bool,
}

/// Result of a serve attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ServeOutcome {
    Served(Served),
    AlreadyDoneToday {
        day: u32,
        next_reset_at: DateTime<Utc>,
        remaining_secs: i64,
    },
}

/// Thin composition over [`AccessGate`] and [`ProgressLedger`].
pub struct Unlock<'a> {
    gate: &'a AccessGate<'a>,
    ledger: &'a ProgressLedger<'a>,
}

impl<'a> Unlock<'a> {
    pub fn new(gate: &'a AccessGate<'a>, ledger: &'a ProgressLedger<'a>) -> Self {
        Self { gate, ledger }
    }

    /// Classify the situation for `key` at `now` without touching either
    /// ledger.
    pub fn classify(&self, key: &LedgerKey, now: DateTime<Utc>) -> Result<UnlockOutcome> {
        let (outcome, _) = self.classify_with_progress(key, now)?;
        Ok(outcome)
    }

    fn classify_with_progress(
        &self,
        key: &LedgerKey,
        now: DateTime<Utc>,
    ) -> Result<(UnlockOutcome, ProgressSnapshot)> {
        let progress = self.ledger.get_progress(key)?;
        let decision = self.gate.has_access(key, now)?;
        let previous_day = progress.current_day.saturating_sub(1);
        if !decision.open && progress.completed_days.contains(&previous_day) {
            let remaining = (decision.next_reset_at - now).max(Duration::zero());
            let outcome = UnlockOutcome::AlreadyDoneToday {
                day: previous_day,
                next_reset_at: decision.next_reset_at,
                remaining_secs: remaining.num_seconds(),
            };
            return Ok((outcome, progress));
        }
        let day = progress.current_day;
        let outcome = UnlockOutcome::Servable {
            day,
            week_number: week_number(day),
            day_in_week: day_in_week(day),
        };
        Ok((outcome, progress))
    }

    /// Serve the current day: classify, fetch content from the catalog,
    /// pin the day pointer, and record the access.
    ///
    /// Missing content for valid coordinates is `ContentNotFound`; in that
    /// case nothing is recorded.
    pub fn serve(
        &self,
        key: &LedgerKey,
        now: DateTime<Utc>,
        catalog: &dyn ContentCatalog,
    ) -> Result<ServeOutcome> {
        let (outcome, progress) = self.classify_with_progress(key, now)?;
        let (day, week, in_week) = match outcome {
            UnlockOutcome::AlreadyDoneToday {
                day,
                next_reset_at,
                remaining_secs,
            } => {
                return Ok(ServeOutcome::AlreadyDoneToday {
                    day,
                    next_reset_at,
                    remaining_secs,
                })
            }
            UnlockOutcome::Servable {
                day,
                week_number,
                day_in_week,
            } => (day, week_number, day_in_week),
        };

        let content =
            catalog
                .day_content(key.topic_id, week, in_week)
                .ok_or(CoreError::ContentNotFound {
                    topic_id: key.topic_id.get(),
                    day,
                })?;

        // Serving marks the topic as started and pins the pointer.
        self.ledger.set_day(key, i64::from(day))?;
        self.gate.record_access(key, day, now)?;

        Ok(ServeOutcome::Served(Served {
            day,
            week_number: week,
            day_in_week: in_week,
            content,
            already_completed: progress.completed_days.contains(&day),
        }))
    }

    /// Forward the user's explicit completion signal to the ledger.
    pub fn complete(&self, key: &LedgerKey, day: u32) -> Result<()> {
        self.ledger.complete_day(key, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ResetClock;
    use crate::storage::Database;
    use chrono::TimeZone;

    struct StubCatalog;

    impl ContentCatalog for StubCatalog {
        fn day_content(
            &self,
            topic_id: TopicId,
            week_number: u32,
            day_in_week: u32,
        ) -> Option<DayContent> {
            Some(DayContent {
                title: format!("topic {topic_id} week {week_number} day {day_in_week}"),
                intro: String::new(),
                items: vec!["item".into()],
                exercise: "exercise".into(),
            })
        }
    }

    struct EmptyCatalog;

    impl ContentCatalog for EmptyCatalog {
        fn day_content(&self, _: TopicId, _: u32, _: u32) -> Option<DayContent> {
            None
        }
    }

    fn utc(d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, mi, 0).unwrap()
    }

    fn key() -> LedgerKey {
        LedgerKey::new("u1", TopicId::new(2).unwrap())
    }

    #[test]
    fn brand_new_key_is_servable_at_day_one() {
        let db = Database::open_memory().unwrap();
        let gate = AccessGate::new(&db, ResetClock::new(6, 0).unwrap());
        let ledger = ProgressLedger::new(&db);
        let unlock = Unlock::new(&gate, &ledger);

        let outcome = unlock.classify(&key(), utc(10, 9, 0)).unwrap();
        assert_eq!(
            outcome,
            UnlockOutcome::Servable {
                day: 1,
                week_number: 1,
                day_in_week: 1,
            }
        );
    }

    #[test]
    fn serve_records_access_and_marks_started() {
        let db = Database::open_memory().unwrap();
        let gate = AccessGate::new(&db, ResetClock::new(6, 0).unwrap());
        let ledger = ProgressLedger::new(&db);
        let unlock = Unlock::new(&gate, &ledger);
        let t0 = utc(10, 9, 0);

        let outcome = unlock.serve(&key(), t0, &StubCatalog).unwrap();
        let ServeOutcome::Served(served) = outcome else {
            panic!("expected a served day");
        };
        assert_eq!(served.day, 1);
        assert!(!served.already_completed);
        assert_eq!(served.content.title, "topic 2 week 1 day 1");

        let progress = ledger.get_progress(&key()).unwrap();
        assert!(progress.started);
        assert!(!gate.has_access(&key(), t0 + Duration::seconds(1)).unwrap().open);
    }

    #[test]
    fn locked_with_incomplete_day_reserves_same_day() {
        let db = Database::open_memory().unwrap();
        let gate = AccessGate::new(&db, ResetClock::new(6, 0).unwrap());
        let ledger = ProgressLedger::new(&db);
        let unlock = Unlock::new(&gate, &ledger);
        let t0 = utc(10, 9, 0);

        unlock.serve(&key(), t0, &StubCatalog).unwrap();
        // Gate closed, day 1 not completed: still servable (re-serve).
        let outcome = unlock.classify(&key(), t0 + Duration::hours(1)).unwrap();
        assert_eq!(
            outcome,
            UnlockOutcome::Servable {
                day: 1,
                week_number: 1,
                day_in_week: 1,
            }
        );
        let again = unlock
            .serve(&key(), t0 + Duration::hours(1), &StubCatalog)
            .unwrap();
        assert!(matches!(again, ServeOutcome::Served(_)));
    }

    #[test]
    fn completed_and_locked_is_already_done_today() {
        let db = Database::open_memory().unwrap();
        let clock = ResetClock::new(6, 0).unwrap();
        let gate = AccessGate::new(&db, clock);
        let ledger = ProgressLedger::new(&db);
        let unlock = Unlock::new(&gate, &ledger);
        let t0 = utc(10, 9, 0);

        unlock.serve(&key(), t0, &StubCatalog).unwrap();
        unlock.complete(&key(), 1).unwrap();

        let later = t0 + Duration::hours(2);
        let outcome = unlock.classify(&key(), later).unwrap();
        assert_eq!(
            outcome,
            UnlockOutcome::AlreadyDoneToday {
                day: 1,
                next_reset_at: clock.next_boundary(t0),
                remaining_secs: (clock.next_boundary(t0) - later).num_seconds(),
            }
        );

        // The next boundary makes day 2 servable.
        let tomorrow = utc(11, 6, 1);
        let outcome = unlock.classify(&key(), tomorrow).unwrap();
        assert_eq!(
            outcome,
            UnlockOutcome::Servable {
                day: 2,
                week_number: 1,
                day_in_week: 2,
            }
        );
    }

    #[test]
    fn missing_content_is_an_error_and_records_nothing() {
        let db = Database::open_memory().unwrap();
        let gate = AccessGate::new(&db, ResetClock::new(6, 0).unwrap());
        let ledger = ProgressLedger::new(&db);
        let unlock = Unlock::new(&gate, &ledger);
        let t0 = utc(10, 9, 0);

        let result = unlock.serve(&key(), t0, &EmptyCatalog);
        assert!(matches!(
            result,
            Err(CoreError::ContentNotFound { topic_id: 2, day: 1 })
        ));
        assert!(gate.has_access(&key(), t0).unwrap().open);
        assert_eq!(ledger.find_progress(&key()).unwrap(), None);
    }

    #[test]
    fn reserve_of_completed_day_reports_already_completed() {
        let db = Database::open_memory().unwrap();
        let gate = AccessGate::new(&db, ResetClock::new(6, 0).unwrap());
        let ledger = ProgressLedger::new(&db);
        let unlock = Unlock::new(&gate, &ledger);

        // Operator rewinds the pointer onto a completed day.
        ledger.complete_day(&key(), 3).unwrap();
        ledger.set_day(&key(), 3).unwrap();

        let outcome = unlock.serve(&key(), utc(10, 9, 0), &StubCatalog).unwrap();
        let ServeOutcome::Served(served) = outcome else {
            panic!("expected a served day");
        };
        assert_eq!(served.day, 3);
        assert!(served.already_completed);
    }
}
