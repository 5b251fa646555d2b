//! Typed table rows.
//!
//! Each scraped table kind has an explicit row struct. Serde field renames
//! keep the historical CSV column names so files written by earlier tooling
//! stay loadable.

use serde::{Deserialize, Serialize};

/// One player on one team's roster, with season-aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Jersey number; -1 when unparseable
    #[serde(rename = "No.")]
    pub number: i32,

    /// Title-cased display name
    #[serde(rename = "Name")]
    pub name: String,

    /// Uppercase name used for fuzzy matching by downstream consumers
    #[serde(rename = "UpperName")]
    pub upper_name: String,

    #[serde(rename = "Position")]
    pub position: String,

    #[serde(rename = "Height")]
    pub height: String,

    #[serde(rename = "Team")]
    pub team: String,

    #[serde(rename = "Seed")]
    pub seed: u32,

    #[serde(rename = "Gs")]
    pub goals: i64,

    #[serde(rename = "As")]
    pub assists: i64,

    #[serde(rename = "Ds")]
    pub blocks: i64,

    #[serde(rename = "Ts")]
    pub turns: i64,

    /// Source roster page URL
    #[serde(rename = "url")]
    pub url: String,
}

/// One player's contribution to one match. Both sides of a match contribute
/// rows; the match is identified by its source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReportRow {
    #[serde(rename = "No.")]
    pub number: i32,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "UpperName")]
    pub upper_name: String,

    #[serde(rename = "Gs")]
    pub goals: i64,

    #[serde(rename = "As")]
    pub assists: i64,

    #[serde(rename = "Ds")]
    pub blocks: i64,

    #[serde(rename = "Ts")]
    pub turns: i64,

    /// Match report page URL (match identity key)
    #[serde(rename = "url")]
    pub url: String,

    #[serde(rename = "Team")]
    pub team: String,

    #[serde(rename = "Seed")]
    pub seed: u32,

    #[serde(rename = "Score")]
    pub score: i64,

    #[serde(rename = "Opp Team")]
    pub opp_team: String,

    #[serde(rename = "Opp Seed")]
    pub opp_seed: u32,

    #[serde(rename = "Opp Score")]
    pub opp_score: i64,
}

/// One team's final-score summary for one match; exactly two rows exist per
/// match (home first, then away).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResultRow {
    #[serde(rename = "url")]
    pub url: String,

    #[serde(rename = "Team")]
    pub team: String,

    #[serde(rename = "Opponent")]
    pub opponent: String,

    #[serde(rename = "Score")]
    pub score: i64,

    #[serde(rename = "Opp Score")]
    pub opp_score: i64,

    #[serde(rename = "Seed")]
    pub seed: u32,

    #[serde(rename = "Opp Seed")]
    pub opp_seed: u32,

    /// Goals summed over this team's match report rows
    #[serde(rename = "Gs")]
    pub goals: i64,

    #[serde(rename = "As")]
    pub assists: i64,

    #[serde(rename = "Ds")]
    pub blocks: i64,

    #[serde(rename = "Ts")]
    pub turns: i64,
}

impl MatchResultRow {
    /// A win is a strictly greater own final score.
    pub fn is_win(&self) -> bool {
        self.score > self.opp_score
    }
}

/// One point of a match's running score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreProgressionRow {
    #[serde(rename = "url")]
    pub url: String,

    #[serde(rename = "Home Team")]
    pub home_team: String,

    #[serde(rename = "Away Team")]
    pub away_team: String,

    #[serde(rename = "Home Score")]
    pub home_score: i64,

    #[serde(rename = "Away Score")]
    pub away_score: i64,
}

/// Win/loss aggregate for one team, derived from match result rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(rename = "Team")]
    pub team: String,

    #[serde(rename = "Games Played")]
    pub games_played: u32,

    #[serde(rename = "Games Won")]
    pub games_won: u32,

    #[serde(rename = "Points Scored")]
    pub points_scored: i64,

    #[serde(rename = "Points Lost")]
    pub points_lost: i64,

    #[serde(rename = "Ds")]
    pub blocks: i64,

    #[serde(rename = "Ts")]
    pub turns: i64,
}

/// The four tables owned by one tournament instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentTables {
    pub rosters: Vec<RosterRow>,
    pub match_reports: Vec<MatchReportRow>,
    pub match_results: Vec<MatchResultRow>,
    pub score_progressions: Vec<ScoreProgressionRow>,
}
