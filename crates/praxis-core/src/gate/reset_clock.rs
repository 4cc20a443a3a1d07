//! Reset clock: the recurring daily boundary after which access reopens.
//!
//! One configuration object (reset hour + UTC offset) consumed identically
//! by every caller. An instant exactly on the boundary belongs to the new
//! window.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Utc};

use crate::error::ConfigError;

/// Default reset hour, 06:00 local.
pub const DEFAULT_RESET_HOUR: u8 = 6;
/// Default UTC offset in minutes (UTC+3:30).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 210;

/// Boundary arithmetic for the daily unlock window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetClock {
    reset_time: NaiveTime,
    offset: FixedOffset,
}

impl ResetClock {
    /// Build a clock from a reset hour (0-23) and a UTC offset in minutes.
    pub fn new(hour: u8, utc_offset_minutes: i32) -> Result<Self, ConfigError> {
        let reset_time =
            NaiveTime::from_hms_opt(u32::from(hour), 0, 0).ok_or(ConfigError::InvalidValue {
                key: "reset.hour".into(),
                message: format!("{hour} is not a valid hour of day"),
            })?;
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidValue {
                key: "reset.utc_offset_minutes".into(),
                message: format!("{utc_offset_minutes} is not a valid UTC offset"),
            })?;
        Ok(Self { reset_time, offset })
    }

    pub fn hour(&self) -> u32 {
        use chrono::Timelike;
        self.reset_time.hour()
    }

    pub fn utc_offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Most recent boundary at or before `now`: today's reset hour if `now`
    /// is at/after it in the configured offset, otherwise yesterday's.
    pub fn current_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset).naive_local();
        let mut boundary = local.date().and_time(self.reset_time);
        if local < boundary {
            boundary = boundary - Duration::days(1);
        }
        self.to_utc(boundary)
    }

    /// Smallest boundary strictly greater than `now`. With a fixed offset
    /// this is always exactly one day past the current boundary.
    pub fn next_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.current_boundary(now) + Duration::days(1)
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        (local - self.offset).and_utc()
    }
}
