use clap::Subcommand;
use praxis_core::{AccessGate, Config, ProgressLedger, Unlock, UnlockOutcome};

use crate::common;

#[derive(Subcommand)]
pub enum DayAction {
    /// Classify the key (servable / already done today) without recording
    Show {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        /// Evaluate at this RFC3339 instant instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// Mark the current day as served (content delivery is external)
    Serve {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        #[arg(long)]
        at: Option<String>,
    },
}

pub fn run(action: DayAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = common::open_database(&config)?;
    let gate = AccessGate::new(&db, config.reset_clock()?);
    let ledger = ProgressLedger::new(&db);
    let unlock = Unlock::new(&gate, &ledger);

    match action {
        DayAction::Show { user, topic, at } => {
            let key = common::ledger_key(&user, topic)?;
            let outcome = unlock.classify(&key, common::parse_at(at.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        DayAction::Serve { user, topic, at } => {
            let key = common::ledger_key(&user, topic)?;
            let now = common::parse_at(at.as_deref())?;
            let outcome = unlock.classify(&key, now)?;
            if let UnlockOutcome::Servable { day, .. } = outcome {
                // The transport fetches the content; we pin the pointer
                // and close the gate for this window.
                ledger.set_day(&key, i64::from(day))?;
                gate.record_access(&key, day, now)?;
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
