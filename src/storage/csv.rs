//! CSV-file storage backend.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::TournamentTables;
use crate::storage::{ScrapeDiagnostics, TableStore};

/// Stores one event's tables as header-plus-rows CSV files (UTF-8) under a
/// data directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path(&self, key: &str, suffix: &str, ext: &str) -> PathBuf {
        self.data_dir.join(format!("{key}_{suffix}.{ext}"))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn write_csv<T: Serialize>(&self, key: &str, suffix: &str, rows: &[T]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        self.write_bytes(&self.path(key, suffix, "csv"), &bytes).await
    }

    async fn read_csv<T: DeserializeOwned>(&self, key: &str, suffix: &str) -> Result<Vec<T>> {
        let bytes = tokio::fs::read(self.path(key, suffix, "csv")).await?;
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

#[async_trait]
impl TableStore for CsvStore {
    async fn save_tables(&self, key: &str, tables: &TournamentTables) -> Result<()> {
        self.write_csv(key, "rosters", &tables.rosters).await?;
        self.write_csv(key, "match_reports", &tables.match_reports)
            .await?;
        self.write_csv(key, "match_results", &tables.match_results)
            .await?;
        self.write_csv(key, "scores", &tables.score_progressions)
            .await?;
        log::info!(
            "Wrote tables for {key} to {}",
            self.data_dir.display()
        );
        Ok(())
    }

    async fn load_tables(&self, key: &str) -> Result<TournamentTables> {
        Ok(TournamentTables {
            rosters: self.read_csv(key, "rosters").await?,
            match_reports: self.read_csv(key, "match_reports").await?,
            match_results: self.read_csv(key, "match_results").await?,
            score_progressions: self.read_csv(key, "scores").await?,
        })
    }

    async fn save_diagnostics(&self, key: &str, diagnostics: &ScrapeDiagnostics) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(diagnostics)?;
        self.write_bytes(&self.path(key, "diagnostics", "json"), &bytes)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{MatchResultRow, RosterRow, ScoreProgressionRow};
    use tempfile::TempDir;

    fn sample_tables() -> TournamentTables {
        TournamentTables {
            rosters: vec![RosterRow {
                number: 7,
                name: "Jane Doe".to_string(),
                upper_name: "JANE DOE".to_string(),
                position: "Handler".to_string(),
                height: String::new(),
                team: "Rockets".to_string(),
                seed: 1,
                goals: 12,
                assists: 4,
                blocks: 3,
                turns: 5,
                url: "/team?EventTeamId=a".to_string(),
            }],
            match_reports: Vec::new(),
            match_results: vec![MatchResultRow {
                url: "/m?EventGameId=g1".to_string(),
                team: "Rockets".to_string(),
                opponent: "Comets".to_string(),
                score: 15,
                opp_score: 11,
                seed: 1,
                opp_seed: 2,
                goals: 15,
                assists: 14,
                blocks: 6,
                turns: 9,
            }],
            score_progressions: vec![ScoreProgressionRow {
                url: "/m?EventGameId=g1".to_string(),
                home_team: "Rockets".to_string(),
                away_team: "Comets".to_string(),
                home_score: 1,
                away_score: 0,
            }],
        }
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(tmp.path());
        let tables = sample_tables();

        store.save_tables("2016_d1college_nationals_men", &tables)
            .await
            .unwrap();
        let loaded = store
            .load_tables("2016_d1college_nationals_men")
            .await
            .unwrap();
        assert_eq!(loaded, tables);
    }

    #[tokio::test]
    async fn test_load_missing_event_fails() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(tmp.path());
        let result = store.load_tables("2016_d1college_nationals_men").await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_requires_all_tables() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(tmp.path());

        // Only some of the four files present: load must not half-populate.
        let key = "2016_d1college_nationals_men";
        store
            .write_csv(key, "rosters", &sample_tables().rosters)
            .await
            .unwrap();
        assert!(store.load_tables(key).await.is_err());
    }

    #[tokio::test]
    async fn test_diagnostics_written_as_json() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(tmp.path());
        let diagnostics = ScrapeDiagnostics {
            warnings: vec!["score progression short".to_string()],
            ..ScrapeDiagnostics::default()
        };

        store.save_diagnostics("k", &diagnostics).await.unwrap();
        let raw = std::fs::read_to_string(tmp.path().join("k_diagnostics.json")).unwrap();
        let parsed: ScrapeDiagnostics = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.warnings, diagnostics.warnings);
        assert!(!parsed.is_clean());
    }
}
