//! Persistence for tournament tables.
//!
//! One event's tables live as flat CSV files under the configured data
//! directory, named by the deterministic event key:
//!
//! ```text
//! {data_dir}/
//! ├── {event_key}_rosters.csv
//! ├── {event_key}_match_reports.csv
//! ├── {event_key}_match_results.csv
//! ├── {event_key}_scores.csv
//! └── {event_key}_diagnostics.json
//! ```

pub mod csv;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::TournamentTables;

pub use csv::CsvStore;

/// Data problems surfaced by a scrape, persisted alongside the tables.
/// These are diagnostics to query, never failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeDiagnostics {
    pub generated_at: DateTime<Utc>,
    /// Teams whose roster scrape failed (their rows are absent)
    pub failed_teams: Vec<String>,
    /// Placeholder match pages skipped (both team slots "TBD")
    pub skipped_matches: Vec<String>,
    /// Matches whose scrape failed (no rows in any table)
    pub failed_matches: Vec<String>,
    /// Data-integrity warnings, e.g. score progressions short of the final
    pub warnings: Vec<String>,
}

impl Default for ScrapeDiagnostics {
    fn default() -> Self {
        Self {
            generated_at: Utc::now(),
            failed_teams: Vec::new(),
            skipped_matches: Vec::new(),
            failed_matches: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ScrapeDiagnostics {
    /// True when the scrape surfaced no problems at all.
    pub fn is_clean(&self) -> bool {
        self.failed_teams.is_empty()
            && self.skipped_matches.is_empty()
            && self.failed_matches.is_empty()
            && self.warnings.is_empty()
    }
}

/// Backend-agnostic store for one event's tables.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Write all four tables for the given event key.
    async fn save_tables(&self, key: &str, tables: &TournamentTables) -> Result<()>;

    /// Load all four tables. Fails (typically with a not-found I/O error)
    /// unless every table file is present.
    async fn load_tables(&self, key: &str) -> Result<TournamentTables>;

    /// Persist scrape diagnostics next to the tables.
    async fn save_diagnostics(&self, key: &str, diagnostics: &ScrapeDiagnostics) -> Result<()>;
}
