//! Shared helpers for CLI commands.

use chrono::{DateTime, Duration, Utc};
use praxis_core::{storage, Config, Database, LedgerKey, TopicId};

/// Open the ledger database under the data directory.
pub fn open_database(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    let path = storage::data_dir()?.join("praxis.db");
    Ok(Database::open(path, &config.storage)?)
}

/// Build a validated ledger key from raw CLI arguments.
pub fn ledger_key(user: &str, topic: u8) -> Result<LedgerKey, Box<dyn std::error::Error>> {
    Ok(LedgerKey::new(user, TopicId::new(topic)?))
}

/// Parse an optional `--at` RFC3339 instant, defaulting to now.
pub fn parse_at(at: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc)),
    }
}

/// Render a remaining duration as "2 h 41 min" / "41 min".
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours} h {minutes} min")
    } else {
        format!("{minutes} min")
    }
}
