//! Full scrape-and-persist cycle.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Event, ScrapeConfig};
use crate::pipeline::Tournament;
use crate::storage::{ScrapeDiagnostics, TableStore};

/// Counts and diagnostics from one completed scrape.
#[derive(Debug)]
pub struct ScrapeSummary {
    pub event_key: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub roster_rows: usize,
    pub report_rows: usize,
    pub matches: usize,
    pub progression_rows: usize,
    pub diagnostics: ScrapeDiagnostics,
}

impl ScrapeSummary {
    pub fn log(&self) {
        let elapsed = self.finished_at - self.started_at;
        log::info!(
            "Scraped {} in {}s: {} roster rows, {} matches, {} report rows, {} progression rows",
            self.event_key,
            elapsed.num_seconds(),
            self.roster_rows,
            self.matches,
            self.report_rows,
            self.progression_rows
        );
        if !self.diagnostics.is_clean() {
            log::warn!(
                "{} failed teams, {} skipped matches, {} failed matches, {} warnings",
                self.diagnostics.failed_teams.len(),
                self.diagnostics.skipped_matches.len(),
                self.diagnostics.failed_matches.len(),
                self.diagnostics.warnings.len()
            );
        }
    }
}

/// Scrape every table for the event and persist them through the store.
pub async fn run_scrape(
    event: Event,
    config: ScrapeConfig,
    store: &dyn TableStore,
) -> Result<ScrapeSummary> {
    let started_at = Utc::now();
    let event_key = event.key();
    log::info!("Scraping {event_key}");

    let mut tournament = Tournament::new(event, config)?;
    let tables = tournament.tables().await?;
    tournament.save(store).await?;

    let summary = ScrapeSummary {
        event_key,
        started_at,
        finished_at: Utc::now(),
        roster_rows: tables.rosters.len(),
        report_rows: tables.match_reports.len(),
        // Two result rows per match, home and away.
        matches: tables.match_results.len() / 2,
        progression_rows: tables.score_progressions.len(),
        diagnostics: tournament.diagnostics(),
    };
    summary.log();
    Ok(summary)
}
