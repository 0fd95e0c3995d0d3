mod report;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricecheck")]
#[command(about = "Compare vendor prices for a fixed product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Fetch every product page, print the comparison table and write the CSV file (default)
    Run,
    /// Validate the catalog and vendor strategies without fetching anything
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = pricecheck_core::load_app_config()?;
    // Logs go to stderr so stdout carries only the report.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run::run_report(&config).await,
        Commands::Check => run::run_check(&config),
    }
}
