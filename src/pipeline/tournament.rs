//! Tournament facade: one event's derived tables, computed lazily on first
//! access and cached for the instance lifetime.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    Event, MatchReportRow, MatchResultRow, RosterRow, ScoreProgressionRow, ScrapeConfig,
    TeamRecord, TournamentTables,
};
use crate::services::{
    MatchOutcome, MatchScraper, RosterOutcome, RosterScraper, SchedulePage, TableFetcher,
    resolve_event,
};
use crate::storage::{ScrapeDiagnostics, TableStore};

/// Container and helpers for one event's scraped tables.
///
/// Tables are built once on first access; an explicit [`Tournament::load`]
/// replaces them wholesale from a store.
pub struct Tournament {
    event: Event,
    config: Arc<ScrapeConfig>,
    fetcher: Arc<TableFetcher>,
    schedule: Option<SchedulePage>,
    rosters: Option<RosterOutcome>,
    matches: Option<MatchOutcome>,
}

impl Tournament {
    pub fn new(event: Event, config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let fetcher = Arc::new(TableFetcher::new(&config)?);
        Ok(Self {
            event,
            config,
            fetcher,
            schedule: None,
            rosters: None,
            matches: None,
        })
    }

    /// Construct from human-readable event inputs.
    pub fn from_event(
        level: &str,
        year: i32,
        gender: &str,
        event: &str,
        config: ScrapeConfig,
    ) -> Result<Self> {
        Self::new(resolve_event(level, year, gender, event)?, config)
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Player-season statistics for every team at this event.
    pub async fn rosters(&mut self) -> Result<&[RosterRow]> {
        Ok(&self.roster_outcome().await?.rows)
    }

    /// Roster scrape outcome including the failed-team side list.
    pub async fn roster_outcome(&mut self) -> Result<&RosterOutcome> {
        if self.rosters.is_none() {
            self.ensure_schedule().await?;
            let schedule = self.schedule()?;
            let scraper =
                RosterScraper::new(Arc::clone(&self.fetcher), self.config.max_concurrent);
            let outcome = scraper.scrape(schedule).await?;
            self.rosters = Some(outcome);
        }
        self.rosters
            .as_ref()
            .ok_or_else(|| AppError::scrape("tournament", "rosters unavailable"))
    }

    /// Per-match player statistic breakdown, both sides of every match.
    pub async fn match_reports(&mut self) -> Result<&[MatchReportRow]> {
        Ok(&self.match_outcome().await?.reports)
    }

    /// Team-level final-score summary, two rows per match (home, away).
    pub async fn match_results(&mut self) -> Result<&[MatchResultRow]> {
        Ok(&self.match_outcome().await?.results)
    }

    /// Point-by-point running scores for every match.
    pub async fn score_progressions(&mut self) -> Result<&[ScoreProgressionRow]> {
        Ok(&self.match_outcome().await?.progressions)
    }

    /// Match scrape outcome including skip/failure side lists and warnings.
    pub async fn match_outcome(&mut self) -> Result<&MatchOutcome> {
        if self.matches.is_none() {
            self.ensure_schedule().await?;
            let schedule = self.schedule()?;
            let scraper = MatchScraper::new(Arc::clone(&self.fetcher), self.config.max_concurrent);
            let outcome = scraper.scrape(schedule).await?;
            self.matches = Some(outcome);
        }
        self.matches
            .as_ref()
            .ok_or_else(|| AppError::scrape("tournament", "matches unavailable"))
    }

    /// Win/loss/points aggregates per team.
    pub async fn team_results(&mut self) -> Result<Vec<TeamRecord>> {
        Ok(aggregate_team_results(self.match_results().await?))
    }

    /// Match result rows whose summed goals or assists fall short of the
    /// recorded final score. A data-quality diagnostic, not an error.
    pub async fn missing_tallies(&mut self) -> Result<Vec<MatchResultRow>> {
        Ok(missing_tallies(self.match_results().await?))
    }

    /// All four tables, scraping whatever is not yet computed.
    pub async fn tables(&mut self) -> Result<TournamentTables> {
        self.roster_outcome().await?;
        self.match_outcome().await?;
        let rosters = self.rosters.as_ref().map_or(&[][..], |o| &o.rows);
        let matches = self.matches.as_ref();
        Ok(TournamentTables {
            rosters: rosters.to_vec(),
            match_reports: matches.map_or(Vec::new(), |m| m.reports.clone()),
            match_results: matches.map_or(Vec::new(), |m| m.results.clone()),
            score_progressions: matches.map_or(Vec::new(), |m| m.progressions.clone()),
        })
    }

    /// Diagnostics gathered so far (side lists and integrity warnings).
    pub fn diagnostics(&self) -> ScrapeDiagnostics {
        let mut diagnostics = ScrapeDiagnostics::default();
        if let Some(rosters) = &self.rosters {
            diagnostics.failed_teams = rosters.failed_teams.clone();
        }
        if let Some(matches) = &self.matches {
            diagnostics.skipped_matches = matches.skipped_matches.clone();
            diagnostics.failed_matches = matches.failed_matches.clone();
            diagnostics.warnings = matches.warnings.clone();
        }
        diagnostics
    }

    /// Write all tables (scraping as needed) plus diagnostics to the store.
    pub async fn save(&mut self, store: &dyn TableStore) -> Result<()> {
        let tables = self.tables().await?;
        let key = self.event.key();
        store.save_tables(&key, &tables).await?;
        store.save_diagnostics(&key, &self.diagnostics()).await
    }

    /// Replace the in-memory tables wholesale from the store. Either fully
    /// populates all four tables or fails.
    pub async fn load(&mut self, store: &dyn TableStore) -> Result<()> {
        let tables = store.load_tables(&self.event.key()).await?;
        self.install(tables);
        Ok(())
    }

    /// Load from the store; on failure either re-raise (`mandatory`) or fall
    /// back to a fresh scrape-and-persist cycle.
    pub async fn load_or_scrape(&mut self, store: &dyn TableStore, mandatory: bool) -> Result<()> {
        match self.load(store).await {
            Ok(()) => Ok(()),
            Err(error) if !mandatory => {
                log::warn!(
                    "Unable to load saved tables for {}: {error}; scraping instead",
                    self.event.key()
                );
                self.save(store).await
            }
            Err(error) => {
                log::error!("Unable to load saved tables for {}", self.event.key());
                Err(error)
            }
        }
    }

    fn install(&mut self, tables: TournamentTables) {
        self.rosters = Some(RosterOutcome {
            rows: tables.rosters,
            failed_teams: Vec::new(),
        });
        self.matches = Some(MatchOutcome {
            reports: tables.match_reports,
            results: tables.match_results,
            progressions: tables.score_progressions,
            ..MatchOutcome::default()
        });
    }

    async fn ensure_schedule(&mut self) -> Result<()> {
        if self.schedule.is_some() {
            return Ok(());
        }
        let url = self.event.schedule_url(&self.config.base_url);
        log::info!("Downloading schedule page: {url}");
        let body = self.fetcher.fetch_text(&url).await?;
        self.schedule = Some(SchedulePage::parse(&url, &body)?);
        Ok(())
    }

    fn schedule(&self) -> Result<&SchedulePage> {
        self.schedule
            .as_ref()
            .ok_or_else(|| AppError::scrape("tournament", "schedule page unavailable"))
    }
}

/// Group match result rows by team into win/loss/points aggregates.
/// A win is a strictly greater own final score.
pub fn aggregate_team_results(results: &[MatchResultRow]) -> Vec<TeamRecord> {
    let mut records: BTreeMap<&str, TeamRecord> = BTreeMap::new();
    for row in results {
        let record = records.entry(&row.team).or_insert_with(|| TeamRecord {
            team: row.team.clone(),
            games_played: 0,
            games_won: 0,
            points_scored: 0,
            points_lost: 0,
            blocks: 0,
            turns: 0,
        });
        record.games_played += 1;
        if row.is_win() {
            record.games_won += 1;
        }
        record.points_scored += row.score;
        record.points_lost += row.opp_score;
        record.blocks += row.blocks;
        record.turns += row.turns;
    }
    records.into_values().collect()
}

/// Match result rows where summed goals or assists do not reach the final
/// score.
pub fn missing_tallies(results: &[MatchResultRow]) -> Vec<MatchResultRow> {
    results
        .iter()
        .filter(|r| r.goals < r.score || r.assists < r.score)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, Gender, Level};
    use crate::storage::CsvStore;
    use tempfile::TempDir;

    fn result_row(url: &str, team: &str, opponent: &str, score: i64, opp: i64) -> MatchResultRow {
        MatchResultRow {
            url: url.to_string(),
            team: team.to_string(),
            opponent: opponent.to_string(),
            score,
            opp_score: opp,
            seed: 1,
            opp_seed: 2,
            goals: score,
            assists: score,
            blocks: 3,
            turns: 4,
        }
    }

    fn sample_results() -> Vec<MatchResultRow> {
        vec![
            result_row("/g1", "Rockets", "Comets", 15, 11),
            result_row("/g1", "Comets", "Rockets", 11, 15),
            result_row("/g2", "Rockets", "Orbit", 13, 15),
            result_row("/g2", "Orbit", "Rockets", 15, 13),
        ]
    }

    #[test]
    fn test_aggregate_team_results() {
        let records = aggregate_team_results(&sample_results());
        let rockets = records.iter().find(|r| r.team == "Rockets").unwrap();
        assert_eq!(rockets.games_played, 2);
        assert_eq!(rockets.games_won, 1);
        assert_eq!(rockets.points_scored, 28);
        assert_eq!(rockets.points_lost, 26);
        assert_eq!(rockets.blocks, 6);

        // Games played equals the number of matches involving the team, and
        // wins never exceed it.
        let results = sample_results();
        for record in &records {
            let played = results.iter().filter(|r| r.team == record.team).count();
            assert_eq!(record.games_played as usize, played);
            assert!(record.games_won <= record.games_played);
        }
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut reversed = sample_results();
        reversed.reverse();
        assert_eq!(
            aggregate_team_results(&sample_results()),
            aggregate_team_results(&reversed)
        );
    }

    #[test]
    fn test_missing_tallies() {
        let mut results = sample_results();
        assert!(missing_tallies(&results).is_empty());

        results[0].goals = 14; // one goal unaccounted for
        let missing = missing_tallies(&results);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].team, "Rockets");
    }

    fn sample_event() -> Event {
        Event {
            level: Level::D1College,
            gender: Gender::Men,
            year: 2016,
            kind: EventKind::Nationals,
            slug: "USA-Ultimate-D-I-College-Championships-2016".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_replaces_tables_without_scraping() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(tmp.path());
        let key = sample_event().key();

        let tables = TournamentTables {
            match_results: sample_results(),
            ..TournamentTables::default()
        };
        store.save_tables(&key, &tables).await.unwrap();

        let mut tournament = Tournament::new(sample_event(), ScrapeConfig::default()).unwrap();
        tournament.load(&store).await.unwrap();

        // Accessors serve the loaded tables; no network involved.
        assert_eq!(tournament.match_results().await.unwrap().len(), 4);
        assert!(tournament.rosters().await.unwrap().is_empty());
        assert_eq!(tournament.team_results().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_load_mandatory_fails_when_absent() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(tmp.path());
        let mut tournament = Tournament::new(sample_event(), ScrapeConfig::default()).unwrap();
        assert!(tournament.load_or_scrape(&store, true).await.is_err());
    }
}
