// src/services/mod.rs

//! Scraping services: event resolution, fetching, parsing, aggregation.

pub mod fetcher;
pub mod locator;
pub mod matches;
pub mod normalize;
pub mod rosters;
pub mod schedule;
pub mod tables;

pub use fetcher::{TableCache, TableFetcher};
pub use locator::resolve_event;
pub use matches::{MatchOutcome, MatchScraper};
pub use rosters::{RosterOutcome, RosterScraper};
pub use schedule::SchedulePage;
pub use tables::Table;
