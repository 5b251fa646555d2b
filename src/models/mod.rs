// src/models/mod.rs

//! Domain models for the results scraper.

mod config;
mod event;
mod rows;

pub use config::ScrapeConfig;
pub use event::{Event, EventKind, Gender, Level};
pub use rows::{
    MatchReportRow, MatchResultRow, RosterRow, ScoreProgressionRow, TeamRecord, TournamentTables,
};
