//! Program structure and day indexing.
//!
//! The program is fixed: 8 topics, each running 28 days grouped into
//! 4 weeks of 7 days. The indexing functions here are pure and map an
//! absolute day number to its (week, day-in-week) coordinates and back.
//!
//! Out-of-range day numbers are the caller's problem; [`clamp_day`] is
//! what the progress ledger uses to normalize caller-supplied targets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of topics in the program.
pub const TOPIC_COUNT: u8 = 8;
/// Weeks per topic.
pub const WEEKS_PER_TOPIC: u32 = 4;
/// Days per week.
pub const DAYS_PER_WEEK: u32 = 7;
/// Days per topic (4 weeks of 7).
pub const DAYS_PER_TOPIC: u32 = WEEKS_PER_TOPIC * DAYS_PER_WEEK;
/// First day of a topic.
pub const MIN_DAY: u32 = 1;

/// Validated topic identifier in `1..=TOPIC_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(u8);

impl TopicId {
    /// Validate a raw topic id. The core never substitutes a default topic.
    pub fn new(id: u8) -> Result<Self, CoreError> {
        if (1..=TOPIC_COUNT).contains(&id) {
            Ok(Self(id))
        } else {
            Err(CoreError::TopicNotFound { topic_id: id })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All topic ids in order.
    pub fn all() -> impl Iterator<Item = TopicId> {
        (1..=TOPIC_COUNT).map(TopicId)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Week number (1-4) for an absolute day number.
pub fn week_number(day: u32) -> u32 {
    day.saturating_sub(1) / DAYS_PER_WEEK + 1
}

/// Day within the week (1-7) for an absolute day number.
pub fn day_in_week(day: u32) -> u32 {
    day.saturating_sub(1) % DAYS_PER_WEEK + 1
}

/// Absolute day number for a (week, day-in-week) pair.
pub fn day_number(week: u32, day_in_week: u32) -> u32 {
    week.saturating_sub(1) * DAYS_PER_WEEK + day_in_week
}

/// Clamp an arbitrary caller-supplied day into `1..=28`.
pub fn clamp_day(day: i64) -> u32 {
    day.clamp(MIN_DAY as i64, DAYS_PER_TOPIC as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn week_boundaries() {
        assert_eq!(week_number(1), 1);
        assert_eq!(week_number(7), 1);
        assert_eq!(week_number(8), 2);
        assert_eq!(week_number(28), 4);
        assert_eq!(day_in_week(1), 1);
        assert_eq!(day_in_week(7), 7);
        assert_eq!(day_in_week(8), 1);
        assert_eq!(day_in_week(28), 7);
    }

    #[test]
    fn clamp_day_bounds() {
        assert_eq!(clamp_day(999), 28);
        assert_eq!(clamp_day(-5), 1);
        assert_eq!(clamp_day(0), 1);
        assert_eq!(clamp_day(1), 1);
        assert_eq!(clamp_day(28), 28);
        assert_eq!(clamp_day(29), 28);
    }

    #[test]
    fn topic_id_range() {
        assert!(TopicId::new(0).is_err());
        assert!(TopicId::new(1).is_ok());
        assert!(TopicId::new(8).is_ok());
        assert!(TopicId::new(9).is_err());
        assert_eq!(TopicId::all().count(), 8);
    }

    proptest! {
        #[test]
        fn round_trip(day in 1u32..=28) {
            let week = week_number(day);
            let in_week = day_in_week(day);
            prop_assert!((1..=WEEKS_PER_TOPIC).contains(&week));
            prop_assert!((1..=DAYS_PER_WEEK).contains(&in_week));
            prop_assert_eq!(day_number(week, in_week), day);
        }

        #[test]
        fn clamp_is_idempotent(day in any::<i64>()) {
            let clamped = clamp_day(day);
            prop_assert!((MIN_DAY..=DAYS_PER_TOPIC).contains(&clamped));
            prop_assert_eq!(clamp_day(clamped as i64), clamped);
        }
    }
}
