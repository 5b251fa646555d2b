// src/lib.rs

//! USAU Results Library
//!
//! Scrapes tournament results (rosters, match reports, score progressions)
//! from play.usaultimate.org and persists them as CSV tables.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
