use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fifteen-cli", version, about = "Document your day in 15-minute increments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set wake and sleep times and build today's blocks
    Setup {
        /// Wake time (HH:MM)
        wake: String,
        /// Sleep time (HH:MM)
        sleep: String,
    },
    /// Show how many blocks a wake/sleep pair gives, without saving
    Preview {
        /// Wake time (HH:MM), defaults to setup.default_wake
        wake: Option<String>,
        /// Sleep time (HH:MM), defaults to setup.default_sleep
        sleep: Option<String>,
    },
    /// Inspect days
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Label blocks
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fifteen=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Setup { wake, sleep } => commands::setup::run(&wake, &sleep),
        Commands::Preview { wake, sleep } => commands::setup::preview(wake, sleep),
        Commands::Day { action } => commands::day::run(action),
        Commands::Block { action } => commands::block::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
