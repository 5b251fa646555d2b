//! HTML table fetcher with a process-lifetime memo.
//!
//! Event pages are immutable once a tournament concludes, so cached entries
//! are never invalidated. The cache is an explicit object owned by the
//! fetcher and injectable for test isolation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::OnceCell;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ScrapeConfig;
use crate::services::tables::{self, Table};
use crate::utils::resolve_url;

/// Memo key: absolute URL plus the extraction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub url: String,
    pub pattern: String,
    pub header_row: Option<usize>,
}

/// Process-lifetime memo of extracted tables.
///
/// Each key owns a `OnceCell`, so concurrent requests for the same key
/// trigger at most one fetch; failed fetches leave the cell empty and are
/// retried on the next request.
#[derive(Debug, Default)]
pub struct TableCache {
    cells: Mutex<HashMap<TableKey, Arc<OnceCell<Arc<Vec<Table>>>>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, key: &TableKey) -> Arc<OnceCell<Arc<Vec<Table>>>> {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(cells.entry(key.clone()).or_default())
    }

    /// Number of keys with a populated entry.
    pub fn len(&self) -> usize {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.values().filter(|c| c.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches pages and extracts matching HTML tables, memoized by
/// (absolute URL, pattern, header row).
pub struct TableFetcher {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<TableCache>,
}

impl TableFetcher {
    /// Create a fetcher with its own fresh cache.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        Self::with_cache(config, Arc::new(TableCache::new()))
    }

    /// Create a fetcher sharing the given cache.
    pub fn with_cache(config: &ScrapeConfig, cache: Arc<TableCache>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            cache,
        })
    }

    /// Resolve a possibly site-relative URL against the base URL.
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        match Url::parse(&self.base_url) {
            Ok(base) => resolve_url(&base, href),
            Err(_) => format!("{}{}", self.base_url.trim_end_matches('/'), href),
        }
    }

    /// Fetch a page body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let absolute = self.resolve(url);
        log::debug!("GET {absolute}");
        let response = self.client.get(&absolute).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetch a page and extract all tables whose text contains `pattern`,
    /// memoized. Returns [`AppError::TableNotFound`] when nothing matches.
    pub async fn get_tables(
        &self,
        url: &str,
        pattern: &str,
        header_row: Option<usize>,
    ) -> Result<Arc<Vec<Table>>> {
        let key = TableKey {
            url: self.resolve(url),
            pattern: pattern.to_string(),
            header_row,
        };
        let cell = self.cache.cell(&key);
        let found = cell
            .get_or_try_init(|| async {
                let body = self.fetch_text(&key.url).await?;
                let extracted = tables::extract_tables(&body, pattern, header_row)?;
                if extracted.is_empty() {
                    return Err(AppError::table_not_found(&key.url, pattern));
                }
                Ok(Arc::new(extracted))
            })
            .await?;
        Ok(Arc::clone(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> TableFetcher {
        TableFetcher::new(&ScrapeConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_relative_href() {
        let f = fetcher();
        assert_eq!(
            f.resolve("/teams/events/match_report/?EventGameId=abc"),
            "http://play.usaultimate.org/teams/events/match_report/?EventGameId=abc"
        );
        assert_eq!(f.resolve("https://other.com/x"), "https://other.com/x");
    }

    #[tokio::test]
    async fn test_cache_single_init_per_key() {
        let cache = TableCache::new();
        let key = TableKey {
            url: "http://example.com/a".to_string(),
            pattern: "Total:".to_string(),
            header_row: None,
        };

        let mut inits = 0usize;
        for _ in 0..3 {
            let cell = cache.cell(&key);
            cell.get_or_init(|| async {
                inits += 1;
                Arc::new(vec![Table::default()])
            })
            .await;
        }
        assert_eq!(inits, 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_keys_are_independent() {
        let cache = TableCache::new();
        let key_a = TableKey {
            url: "http://example.com/a".to_string(),
            pattern: "Total:".to_string(),
            header_row: None,
        };
        // Same URL, different extraction parameters: distinct entry.
        let key_b = TableKey {
            pattern: "Players".to_string(),
            header_row: Some(0),
            ..key_a.clone()
        };

        cache
            .cell(&key_a)
            .get_or_init(|| async { Arc::new(vec![]) })
            .await;
        assert_eq!(cache.len(), 1);
        assert!(!cache.cell(&key_b).initialized());
    }

    #[tokio::test]
    async fn test_failed_init_not_cached() {
        let cache = TableCache::new();
        let key = TableKey {
            url: "http://example.com/a".to_string(),
            pattern: "Total:".to_string(),
            header_row: None,
        };

        let cell = cache.cell(&key);
        let attempt: std::result::Result<&Arc<Vec<Table>>, AppError> = cell
            .get_or_try_init(|| async { Err(AppError::table_not_found("x", "Total:")) })
            .await;
        assert!(attempt.is_err());
        assert_eq!(cache.len(), 0);
    }
}
