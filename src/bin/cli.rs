//! usau-results CLI
//!
//! Local entry point for scraping and inspecting tournament tables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use usau_results::{
    error::Result,
    models::{Event, ScrapeConfig, TeamRecord},
    pipeline::{self, Tournament},
    services::resolve_event,
    storage::{CsvStore, TableStore},
};

/// usau-results - USA Ultimate tournament results scraper
#[derive(Parser, Debug)]
#[command(
    name = "usau-results",
    version,
    about = "Scrapes rosters, match reports and score progressions from play.usaultimate.org"
)]
struct Cli {
    /// Path to a TOML config file (defaults used when absent)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory for persisted CSV tables (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Maximum concurrent fetches (overrides config)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Event selection shared by every subcommand.
#[derive(Args, Debug)]
struct EventArgs {
    /// Competition level: club, d1college or d3college
    #[arg(long)]
    level: String,

    /// Tournament year
    #[arg(long)]
    year: i32,

    /// Division: men, women or mixed
    #[arg(long)]
    gender: String,

    /// Event name, e.g. nationals, us-open, pro-flight-finale
    #[arg(long, default_value = "nationals")]
    event: String,

    /// Override the derived event page slug
    #[arg(long)]
    slug: Option<String>,
}

impl EventArgs {
    fn resolve(&self) -> Result<Event> {
        let mut event = resolve_event(&self.level, self.year, &self.gender, &self.event)?;
        if let Some(slug) = &self.slug {
            event.slug = slug.clone();
        }
        Ok(event)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every table for an event and persist them as CSV
    Scrape {
        #[command(flatten)]
        event: EventArgs,
    },

    /// Load persisted tables and print per-team results
    Load {
        #[command(flatten)]
        event: EventArgs,

        /// Scrape and persist when no saved tables exist
        #[arg(long)]
        scrape: bool,
    },

    /// Resolve an event to its key and schedule URL without fetching
    Resolve {
        #[command(flatten)]
        event: EventArgs,
    },
}

fn print_team_results(records: &[TeamRecord]) {
    println!(
        "{:<40} {:>6} {:>5} {:>7} {:>7}",
        "Team", "Played", "Won", "Scored", "Lost"
    );
    for record in records {
        println!(
            "{:<40} {:>6} {:>5} {:>7} {:>7}",
            record.team,
            record.games_played,
            record.games_won,
            record.points_scored,
            record.points_lost
        );
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ScrapeConfig::load_or_default(&cli.config);
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrent = concurrency;
    }
    config.validate()?;

    let store = CsvStore::new(&config.data_dir);

    match cli.command {
        Command::Scrape { event } => {
            let event = event.resolve()?;
            pipeline::run_scrape(event.clone(), config, &store).await?;

            let tables = store.load_tables(&event.key()).await?;
            print_team_results(&pipeline::aggregate_team_results(&tables.match_results));
        }

        Command::Load { event, scrape } => {
            let event = event.resolve()?;
            let mut tournament = Tournament::new(event, config)?;
            tournament.load_or_scrape(&store, !scrape).await?;

            print_team_results(&tournament.team_results().await?);

            let missing = tournament.missing_tallies().await?;
            if !missing.is_empty() {
                log::warn!("{} match results have incomplete player tallies", missing.len());
            }
        }

        Command::Resolve { event } => {
            let event = event.resolve()?;
            println!("key: {}", event.key());
            println!("schedule: {}", event.schedule_url(&config.base_url));
        }
    }

    Ok(())
}
