use clap::Subcommand;
use fifteen_core::{Config, DayRecord, Label};

use super::{open_store, parse_date, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show a day's blocks and summary
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored days with their completion
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: DayAction) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match action {
        DayAction::Show { date, json } => {
            let date = parse_date(&store, date.as_deref())?;
            store.load_day(date);
            match store.current_day().filter(|day| day.date == date) {
                Some(day) if json => println!("{}", serde_json::to_string_pretty(day)?),
                Some(day) => print_day(day),
                None => println!("No timeline available. Run 'setup <wake> <sleep>' first."),
            }
        }
        DayAction::List { json } => {
            let summaries: Vec<_> = store.days().into_iter().map(DayRecord::summary).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for s in summaries {
                    println!(
                        "{}  {}/{}  productive {:.0}%  life {:.0}%  unproductive {:.0}%",
                        s.date,
                        s.completed_blocks,
                        s.total_blocks,
                        s.productive_pct,
                        s.life_pct,
                        s.unproductive_pct
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_day(day: &DayRecord) {
    let summary = day.summary();
    println!(
        "{}  {}/{}",
        day.date, summary.completed_blocks, summary.total_blocks
    );
    let shares: Vec<String> = Label::ALL
        .iter()
        .map(|label| format!("{} {:.0}%", label.display_name(), day.percentage(*label)))
        .collect();
    println!("{}", shares.join("  "));
    for (index, block) in day.blocks.iter().enumerate() {
        let label = block.label().map_or("-", |l| l.display_name());
        println!("{index:>3}  {}  {label}", block.time_range());
    }
}
