//! Pipeline entry points.
//!
//! - [`Tournament`]: facade owning one event's lazily scraped tables
//! - [`run_scrape`]: full scrape-and-persist cycle for the CLI

pub mod scrape;
pub mod tournament;

pub use scrape::{ScrapeSummary, run_scrape};
pub use tournament::{Tournament, aggregate_team_results, missing_tallies};
