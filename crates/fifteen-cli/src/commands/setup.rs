use fifteen_core::setup::bounds_on;
use fifteen_core::{block_count, Config};

use super::{open_store, CliResult};

pub fn run(wake: &str, sleep: &str) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;
    let (wake, sleep) = bounds_on(store.today(), wake, sleep)?;
    store.configure(wake, sleep)?;

    let blocks = store.current_day().map_or(0, |day| day.blocks.len());
    println!("{blocks} time blocks for {}", store.today());
    Ok(())
}

pub fn preview(wake: Option<String>, sleep: Option<String>) -> CliResult {
    let config = Config::load()?;
    let wake = wake.unwrap_or_else(|| config.setup.default_wake.clone());
    let sleep = sleep.unwrap_or_else(|| config.setup.default_sleep.clone());

    let today = chrono::Local::now().date_naive();
    let (wake, sleep) = bounds_on(today, &wake, &sleep)?;
    println!("{} time blocks", block_count(wake, sleep, config.slice_length()));
    Ok(())
}
