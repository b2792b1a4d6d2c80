//! Harness racing scraper
//!
//! CLI for collecting horses and emitting normalized racedays.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harness_scraper::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harness_scraper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Horse {
            site,
            start,
            output,
            force,
            no_offspring,
        } => cli::run_horse(site, start, output, force, no_offspring).await,
        Commands::Raceday {
            site,
            input,
            output,
        } => cli::run_raceday(site, input, output),
        Commands::Normalize {
            site,
            field,
            raw,
            entity,
        } => cli::run_normalize(site, field, raw, entity),
        Commands::Show { link, database } => cli::run_show(link, database),
        Commands::Sites => {
            cli::run_sites();
            Ok(())
        }
    }
}
