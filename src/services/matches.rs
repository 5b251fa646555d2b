//! Match aggregator: per-match player reports, team results and score
//! progressions for one event.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{MatchReportRow, MatchResultRow, ScoreProgressionRow};
use crate::services::fetcher::TableFetcher;
use crate::services::normalize::{split_team_seed, split_total_score};
use crate::services::schedule::SchedulePage;
use crate::services::tables::{Table, clean_report_table};

/// Result of a match scrape: the three aligned tables plus diagnostics.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub reports: Vec<MatchReportRow>,
    pub results: Vec<MatchResultRow>,
    pub progressions: Vec<ScoreProgressionRow>,
    /// Placeholder match pages (both team slots "TBD"), skipped
    pub skipped_matches: Vec<String>,
    /// Matches whose fetch or parse failed, isolated and skipped
    pub failed_matches: Vec<String>,
    /// Data-integrity warnings: surfaced, never fatal
    pub warnings: Vec<String>,
}

impl MatchOutcome {
    /// Fold one match's scrape result into the outcome. A malformed team
    /// label aborts; other failures are isolated and recorded.
    fn absorb(&mut self, url: &str, result: Result<Option<MatchBundle>>) -> Result<()> {
        match result {
            Ok(Some(bundle)) => {
                self.reports.extend(bundle.reports);
                self.results.extend(bundle.results);
                self.progressions.extend(bundle.progression);
                self.warnings.extend(bundle.warnings);
            }
            Ok(None) => {
                log::warn!("Empty or malformed match report: {url}");
                self.skipped_matches.push(url.to_string());
            }
            Err(e @ AppError::MalformedTeamLabel(_)) => return Err(e),
            Err(error) => {
                log::warn!("Failed to scrape match {url}: {error}");
                self.failed_matches.push(url.to_string());
            }
        }
        Ok(())
    }
}

/// One fully parsed match.
struct MatchBundle {
    reports: Vec<MatchReportRow>,
    /// Home first, then away
    results: [MatchResultRow; 2],
    progression: Vec<ScoreProgressionRow>,
    warnings: Vec<String>,
}

/// One side of the score table.
struct SideScore {
    name: String,
    seed: u32,
    total: i64,
}

/// Parsed score table: both sides plus the cleaned running score.
struct ScoreSheet {
    home: SideScore,
    away: SideScore,
    progression: Vec<(i64, i64)>,
    warnings: Vec<String>,
}

/// Scrapes every match report linked from the schedule page.
pub struct MatchScraper {
    fetcher: Arc<TableFetcher>,
    max_concurrent: usize,
}

impl MatchScraper {
    pub fn new(fetcher: Arc<TableFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Scrape all matches. Within one match the home result row precedes the
    /// away row; across matches no order is guaranteed when concurrent.
    pub async fn scrape(&self, schedule: &SchedulePage) -> Result<MatchOutcome> {
        let mut outcome = MatchOutcome::default();

        let mut results = stream::iter(schedule.match_urls.iter())
            .map(|url| async move { (url, self.scrape_match(url).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((url, result)) = results.next().await {
            outcome.absorb(url, result)?;
        }

        log::info!(
            "Scraped {} matches ({} skipped, {} failed, {} warnings)",
            outcome.results.len() / 2,
            outcome.skipped_matches.len(),
            outcome.failed_matches.len(),
            outcome.warnings.len()
        );
        Ok(outcome)
    }

    /// Scrape one match page. `Ok(None)` means a placeholder report with
    /// both team slots "TBD".
    async fn scrape_match(&self, url: &str) -> Result<Option<MatchBundle>> {
        let score_tables = self.fetcher.get_tables(url, "Total:", None).await?;
        let Some(sheet) = parse_score_table(url, &score_tables[0])? else {
            return Ok(None);
        };

        // The "Players" pattern can also hit a sidebar table; the first two
        // matches are the home and away contribution tables. Their G/A/D/T
        // header sits in a plain <tr>, hence the explicit header row.
        let player_tables = self.fetcher.get_tables(url, "Players", Some(0)).await?;
        let (Some(home_table), Some(away_table)) = (player_tables.first(), player_tables.get(1))
        else {
            return Err(AppError::scrape(
                "scrape_match",
                format!("expected two player tables at {url}"),
            ));
        };

        build_match(url, sheet, home_table, away_table).map(Some)
    }
}

/// Parse the score table: two team rows of `[label, p1..pn, "Total: N"]`.
fn parse_score_table(url: &str, table: &Table) -> Result<Option<ScoreSheet>> {
    if table.rows.len() < 2 {
        return Err(AppError::scrape(
            "parse_score_table",
            format!("score table at {url} has {} rows, expected 2", table.rows.len()),
        ));
    }
    let home_row = &table.rows[0];
    let away_row = &table.rows[1];
    let home_label = home_row.first().map_or("", String::as_str);
    let away_label = away_row.first().map_or("", String::as_str);

    if home_label == "TBD" && away_label == "TBD" {
        return Ok(None);
    }

    let (home_name, home_seed) = split_team_seed(home_label)?;
    let (away_name, away_seed) = split_team_seed(away_label)?;
    let home_total = split_total_score(home_row.last().map_or("", String::as_str))?;
    let away_total = split_total_score(away_row.last().map_or("", String::as_str))?;

    let mut warnings = Vec::new();
    let progression = clean_progression(
        point_cells(home_row),
        point_cells(away_row),
        (home_total, away_total),
        url,
        &mut warnings,
    );

    Ok(Some(ScoreSheet {
        home: SideScore {
            name: home_name,
            seed: home_seed,
            total: home_total,
        },
        away: SideScore {
            name: away_name,
            seed: away_seed,
            total: away_total,
        },
        progression,
        warnings,
    }))
}

/// The running-score cells of a team row, without the label and total.
fn point_cells(row: &[String]) -> &[String] {
    if row.len() < 2 {
        return &[];
    }
    &row[1..row.len() - 1]
}

/// Clean the running score: the initial row is forced to (0, 0), fully
/// empty point columns are dropped, remaining gaps filled with 0. A final
/// running total exactly one short of the combined final score gets a
/// synthetic final row appended (a known source data quirk); a larger
/// shortfall is surfaced as a warning and the progression kept as-is.
fn clean_progression(
    home: &[String],
    away: &[String],
    finals: (i64, i64),
    url: &str,
    warnings: &mut Vec<String>,
) -> Vec<(i64, i64)> {
    let mut rows = vec![(0, 0)];
    for i in 0..home.len().max(away.len()) {
        let h = home.get(i).map_or("", String::as_str);
        let a = away.get(i).map_or("", String::as_str);
        if h.is_empty() && a.is_empty() {
            continue;
        }
        rows.push((h.parse().unwrap_or(0), a.parse().unwrap_or(0)));
    }

    if let Some(&(last_home, last_away)) = rows.last() {
        let shortfall = (finals.0 + finals.1) - (last_home + last_away);
        if shortfall == 1 {
            rows.push(finals);
        } else if shortfall >= 2 {
            warnings.push(format!(
                "score progression for {url} ends at {last_home}-{last_away}, \
                 {shortfall} points short of the {}-{} final",
                finals.0, finals.1
            ));
        }
    }
    rows
}

/// Assemble one match's rows from the score sheet and both player tables.
fn build_match(
    url: &str,
    sheet: ScoreSheet,
    home_table: &Table,
    away_table: &Table,
) -> Result<MatchBundle> {
    let mut home_table = home_table.clone();
    let mut away_table = away_table.clone();
    clean_report_table(&mut home_table)?;
    clean_report_table(&mut away_table)?;

    let home_rows = report_rows(&home_table, url, &sheet.home, &sheet.away)?;
    let away_rows = report_rows(&away_table, url, &sheet.away, &sheet.home)?;

    let results = [
        sum_result(url, &sheet.home, &sheet.away, &home_rows),
        sum_result(url, &sheet.away, &sheet.home, &away_rows),
    ];

    let progression = sheet
        .progression
        .into_iter()
        .map(|(home_score, away_score)| ScoreProgressionRow {
            url: url.to_string(),
            home_team: sheet.home.name.clone(),
            away_team: sheet.away.name.clone(),
            home_score,
            away_score,
        })
        .collect();

    let mut reports = home_rows;
    reports.extend(away_rows);

    Ok(MatchBundle {
        reports,
        results,
        progression,
        warnings: sheet.warnings,
    })
}

/// Map a normalized player table onto report rows tagged with match context.
fn report_rows(
    table: &Table,
    url: &str,
    own: &SideScore,
    opp: &SideScore,
) -> Result<Vec<MatchReportRow>> {
    let column = |name: &str| {
        table.column(name).ok_or_else(|| {
            AppError::scrape("report_rows", format!("missing column {name:?} at {url}"))
        })
    };
    let number = column("No.")?;
    let name = column("Name")?;
    let upper = column("UpperName")?;
    let goals = column("Gs")?;
    let assists = column("As")?;
    let blocks = column("Ds")?;
    let turns = column("Ts")?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, _) in table.rows.iter().enumerate() {
        let cell = |col: usize| table.cell(i, col);
        let stat = |col: usize| cell(col).parse::<i64>().unwrap_or(0);
        rows.push(MatchReportRow {
            number: cell(number).parse().unwrap_or(-1),
            name: cell(name).to_string(),
            upper_name: cell(upper).to_string(),
            goals: stat(goals),
            assists: stat(assists),
            blocks: stat(blocks),
            turns: stat(turns),
            url: url.to_string(),
            team: own.name.clone(),
            seed: own.seed,
            score: own.total,
            opp_team: opp.name.clone(),
            opp_seed: opp.seed,
            opp_score: opp.total,
        });
    }
    Ok(rows)
}

/// Team-level result row with stats summed over that side's report rows.
/// Summed goals below the final score are possible in the source data and
/// surfaced via the missing-tallies view, not corrected here.
fn sum_result(
    url: &str,
    own: &SideScore,
    opp: &SideScore,
    rows: &[MatchReportRow],
) -> MatchResultRow {
    MatchResultRow {
        url: url.to_string(),
        team: own.name.clone(),
        opponent: opp.name.clone(),
        score: own.total,
        opp_score: opp.total,
        seed: own.seed,
        opp_seed: opp.seed,
        goals: rows.iter().map(|r| r.goals).sum(),
        assists: rows.iter().map(|r| r.assists).sum(),
        blocks: rows.iter().map(|r| r.blocks).sum(),
        turns: rows.iter().map(|r| r.turns).sum(),
    }
}
