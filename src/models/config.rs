//! Application configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Base URL of the federation's site
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent fetches (1 = sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Directory for persisted CSV tables
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,
}

impl ScrapeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::config("base_url is empty"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::config("user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("timeout_secs must be > 0"));
        }
        if self.max_concurrent == 0 {
            return Err(AppError::config("max_concurrent must be > 0"));
        }
        Ok(())
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            data_dir: defaults::data_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "http://play.usaultimate.org".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; usau-results/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
}
