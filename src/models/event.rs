//! Event identity: one tournament instance (level x year x gender x kind).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Competition level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Club,
    D1College,
    D3College,
}

impl Level {
    /// Parse a human-readable level string ("club", "d1college", "d3college").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "club" => Some(Self::Club),
            "d1college" => Some(Self::D1College),
            "d3college" => Some(Self::D3College),
            _ => None,
        }
    }

    /// Short identifier used in persistence keys.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Club => "club",
            Self::D1College => "d1college",
            Self::D3College => "d3college",
        }
    }

    /// Competition category used in schedule URLs.
    pub fn competition(&self) -> &'static str {
        match self {
            Self::Club => "Club",
            Self::D1College | Self::D3College => "College",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Gender division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Mixed,
}

impl Gender {
    /// Parse a gender division string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "men" => Some(Self::Men),
            "women" => Some(Self::Women),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    /// Capitalized form used in schedule URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Mixed => "Mixed",
        }
    }

    /// Lowercase identifier used in persistence keys.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Nationals,
    UsOpen,
    ProSeries,
    SelectSeries,
}

impl EventKind {
    /// Short identifier used in persistence keys.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Nationals => "nationals",
            Self::UsOpen => "us-open",
            Self::ProSeries => "pro-series",
            Self::SelectSeries => "select-series",
        }
    }
}

/// One resolved tournament instance. Immutable once constructed by the
/// event locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub level: Level,
    pub gender: Gender,
    pub year: i32,
    pub kind: EventKind,
    /// Resolved event slug, e.g. "USA-Ultimate-D-I-College-Championships-2016"
    pub slug: String,
}

impl Event {
    /// Full URL of the tournament schedule page.
    pub fn schedule_url(&self, base_url: &str) -> String {
        format!(
            "{base}/events/{slug}/schedule/{gender}/{comp}-{gender}",
            base = base_url.trim_end_matches('/'),
            slug = self.slug,
            gender = self.gender.as_str(),
            comp = self.level.competition(),
        )
    }

    /// Deterministic per-event key used for persisted file names.
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.year,
            self.level.slug(),
            self.kind.slug(),
            self.gender.slug()
        )
    }
}
