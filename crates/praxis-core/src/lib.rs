//! # Praxis Core Library
//!
//! This library provides the core business logic for praxis, a 28-day
//! guided daily practice program split across eight topics. It decides,
//! per (user, topic), whether a new day's content may be served right now,
//! and tracks which days have been completed so the next correct day is
//! served.
//!
//! ## Architecture
//!
//! - **Program**: pure day/week indexing over the fixed 4-week structure
//! - **Access Gate**: daily unlock window driven by a configurable reset
//!   clock (reset hour + UTC offset)
//! - **Progress Ledger**: per-key day pointer and completed-day set
//! - **Unlock**: thin orchestrator combining gate and ledger for callers
//!   such as a chat transport
//! - **Storage**: SQLite-backed ledgers and TOML-based configuration
//!
//! The transport layer, the exercise content itself, identity and payments
//! are external collaborators; the core only exposes the decisions and
//! coordinates they need.
//!
//! ## Key Components
//!
//! - [`AccessGate`]: at most one fresh serve per key per daily window
//! - [`ProgressLedger`]: day pointer and completed-day bookkeeping
//! - [`Unlock`]: locked / servable / already-done-today classification
//! - [`Database`]: ledger persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod gate;
pub mod key;
pub mod program;
pub mod progress;
pub mod storage;
pub mod unlock;

pub use error::{ConfigError, CoreError, Result, StoreError};
pub use gate::{AccessDecision, AccessGate, AccessRecord, AccessStore, ResetClock};
pub use key::LedgerKey;
pub use program::TopicId;
pub use progress::{ProgressLedger, ProgressSnapshot, ProgressStore, TopicSummary, UserSummary};
pub use storage::{Config, Database};
pub use unlock::{ContentCatalog, DayContent, ServeOutcome, Served, Unlock, UnlockOutcome};
