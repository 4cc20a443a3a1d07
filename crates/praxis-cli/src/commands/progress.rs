use clap::Subcommand;
use praxis_core::{Config, ProgressLedger};

use crate::common;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Progress snapshot for a key
    Show {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
    },
    /// Move the day pointer (clamped into 1..=28)
    SetDay {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        #[arg(long, allow_hyphen_values = true)]
        day: i64,
    },
    /// Mark a day completed and advance the pointer
    Complete {
        #[arg(long)]
        user: String,
        #[arg(long)]
        topic: u8,
        #[arg(long)]
        day: u32,
    },
    /// Per-topic and overall completion counts for a user
    Summary {
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = common::open_database(&config)?;
    let ledger = ProgressLedger::new(&db);

    match action {
        ProgressAction::Show { user, topic } => {
            let key = common::ledger_key(&user, topic)?;
            let progress = ledger.get_progress(&key)?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        ProgressAction::SetDay { user, topic, day } => {
            let key = common::ledger_key(&user, topic)?;
            let effective = ledger.set_day(&key, day)?;
            println!("{effective}");
        }
        ProgressAction::Complete { user, topic, day } => {
            let key = common::ledger_key(&user, topic)?;
            ledger.complete_day(&key, day)?;
            let progress = ledger.get_progress(&key)?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        ProgressAction::Summary { user } => {
            let summary = ledger.user_summary(&user)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
