use clap::Subcommand;
use fifteen_core::{Config, DayStore, Label};
use uuid::Uuid;

use super::{open_store, parse_date, CliResult};

#[derive(Subcommand)]
pub enum BlockAction {
    /// Label a block
    Set {
        /// Block position in the day (0-based)
        index: usize,
        /// productive, life or unproductive
        label: Label,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Copy the previous block's label onto a block
    Same {
        /// Block position in the day (0-based)
        index: usize,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: BlockAction) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match action {
        BlockAction::Set { index, label, date } => {
            let id = block_at(&mut store, date.as_deref(), index)?;
            store.set_label(id, label);
        }
        BlockAction::Same { index, date } => {
            let id = block_at(&mut store, date.as_deref(), index)?;
            store.copy_previous_label(id);
        }
    }

    if let Some(day) = store.current_day() {
        println!(
            "{}/{} blocks labeled on {}",
            day.completed_count(),
            day.blocks.len(),
            day.date
        );
    }
    Ok(())
}

/// Load the day and resolve a block position to its id.
fn block_at(
    store: &mut DayStore,
    date: Option<&str>,
    index: usize,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    let date = parse_date(store, date)?;
    store.load_day(date);
    let day = store
        .current_day()
        .filter(|day| day.date == date)
        .ok_or_else(|| format!("no timeline for {date}; run 'setup' first"))?;
    let block = day
        .blocks
        .get(index)
        .ok_or_else(|| format!("block {index} out of range (day has {})", day.blocks.len()))?;
    Ok(block.id)
}
