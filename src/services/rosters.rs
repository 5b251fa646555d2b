//! Roster aggregator: per-team season statistics for one event.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::RosterRow;
use crate::services::fetcher::TableFetcher;
use crate::services::normalize::{split_team_seed, title_name};
use crate::services::schedule::{SchedulePage, TeamLink};
use crate::services::tables::Table;

/// Result of a roster scrape. Teams whose fetch failed are listed by label
/// and simply absent from `rows`.
#[derive(Debug, Default)]
pub struct RosterOutcome {
    pub rows: Vec<RosterRow>,
    pub failed_teams: Vec<String>,
}

/// Scrapes every team's roster table and concatenates them.
pub struct RosterScraper {
    fetcher: Arc<TableFetcher>,
    max_concurrent: usize,
}

impl RosterScraper {
    pub fn new(fetcher: Arc<TableFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Scrape all rosters linked from the schedule page.
    ///
    /// A single team's fetch or table failure is isolated: it is logged and
    /// recorded in `failed_teams` without aborting the event scrape. A
    /// malformed team label still aborts; that is a data quality bug to fix
    /// at the source.
    pub async fn scrape(&self, schedule: &SchedulePage) -> Result<RosterOutcome> {
        let mut outcome = RosterOutcome::default();

        let mut results = stream::iter(schedule.team_links.iter())
            .map(|link| async move { (link, self.scrape_team(link).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((link, result)) = results.next().await {
            match result {
                Ok(rows) => outcome.rows.extend(rows),
                Err(e @ AppError::MalformedTeamLabel(_)) => return Err(e),
                Err(error) => {
                    log::warn!(
                        "Failed to scrape roster for {} ({}): {}",
                        link.label,
                        link.href,
                        error
                    );
                    outcome.failed_teams.push(link.label.clone());
                }
            }
        }

        log::info!(
            "Scraped {} roster rows from {} teams ({} failed)",
            outcome.rows.len(),
            schedule.team_links.len() - outcome.failed_teams.len(),
            outcome.failed_teams.len()
        );
        Ok(outcome)
    }

    async fn scrape_team(&self, link: &TeamLink) -> Result<Vec<RosterRow>> {
        let (team, seed) = split_team_seed(&link.label)?;
        // The roster is the table carrying a Position column.
        let tables = self.fetcher.get_tables(&link.href, "Position", None).await?;
        let table = tables.first().ok_or_else(|| {
            AppError::scrape("scrape_team", format!("no roster table at {}", link.href))
        })?;
        parse_roster_table(table, &link.href, &team, seed)
    }
}

/// Map a roster table onto typed rows, tagged with team context.
fn parse_roster_table(table: &Table, url: &str, team: &str, seed: u32) -> Result<Vec<RosterRow>> {
    let column = |names: &[&str]| {
        table.column_any(names).ok_or_else(|| {
            AppError::scrape(
                "parse_roster_table",
                format!("missing column {names:?} at {url}"),
            )
        })
    };
    let number = column(&["No.", "No"])?;
    let name = column(&["Name"])?;
    let position = column(&["Position", "Pos.", "Pos"])?;
    let height = table.column_any(&["Height", "Ht.", "Ht"]);
    let goals = column(&["G"])?;
    let assists = column(&["A"])?;
    let blocks = column(&["D"])?;
    let turns = column(&["T"])?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, _) in table.rows.iter().enumerate() {
        let cell = |col: usize| table.cell(i, col);
        let stat = |col: usize| cell(col).parse::<i64>().unwrap_or(0);

        // Idempotent derivation: title-casing an already title-cased name
        // is a no-op, as is re-uppercasing.
        let display_name = title_name(cell(name));
        rows.push(RosterRow {
            number: cell(number).parse().unwrap_or(-1),
            upper_name: display_name.to_uppercase(),
            name: display_name,
            position: cell(position).to_string(),
            height: height.map_or(String::new(), |h| cell(h).to_string()),
            team: team.to_string(),
            seed,
            goals: stat(goals),
            assists: stat(assists),
            blocks: stat(blocks),
            turns: stat(turns),
            url: url.to_string(),
        });
    }
    Ok(rows)
}
