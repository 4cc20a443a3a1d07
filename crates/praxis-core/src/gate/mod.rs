mod access;
mod reset_clock;

pub use access::{AccessDecision, AccessGate, AccessRecord, AccessStore};
pub use reset_clock::{ResetClock, DEFAULT_RESET_HOUR, DEFAULT_UTC_OFFSET_MINUTES};
