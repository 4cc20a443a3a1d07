use clap::Subcommand;
use praxis_core::{AccessGate, Config};

use crate::common;

#[derive(Subcommand)]
pub enum GateAction {
    /// Whether the gate is open for a key
    Status {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        /// Evaluate at this RFC3339 instant instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// Record that a day was served
    Record {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        #[arg(long)]
        day: u32,
        #[arg(long)]
        at: Option<String>,
    },
    /// Remaining time until the next reset
    Remaining {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        #[arg(long)]
        at: Option<String>,
    },
    /// Delete the access record (testing/admin)
    Reset {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
    },
}

pub fn run(action: GateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = common::open_database(&config)?;
    let gate = AccessGate::new(&db, config.reset_clock()?);

    match action {
        GateAction::Status { user, topic, at } => {
            let key = common::ledger_key(&user, topic)?;
            let decision = gate.has_access(&key, common::parse_at(at.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        GateAction::Record {
            user,
            topic,
            day,
            at,
        } => {
            let key = common::ledger_key(&user, topic)?;
            let record = gate.record_access(&key, day, common::parse_at(at.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        GateAction::Remaining { user, topic, at } => {
            let key = common::ledger_key(&user, topic)?;
            let remaining = gate.remaining_time(&key, common::parse_at(at.as_deref())?)?;
            println!("{}", common::format_remaining(remaining));
        }
        GateAction::Reset { user, topic } => {
            let key = common::ledger_key(&user, topic)?;
            gate.reset(&key)?;
            println!("ok");
        }
    }
    Ok(())
}
