//! Tournament schedule page parsing.
//!
//! The schedule page carries everything the aggregators need: team links
//! inside the pool groupings, and links to every match report.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// A team link from a pool grouping: the roster URL and the raw
/// "Name (seed)" label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLink {
    pub href: String,
    pub label: String,
}

/// Parsed schedule page.
#[derive(Debug, Clone, Default)]
pub struct SchedulePage {
    /// Schedule page URL this was parsed from
    pub url: String,
    pub team_links: Vec<TeamLink>,
    /// De-duplicated match report URLs, first-occurrence order. The schedule
    /// page is known to sometimes link the same match twice.
    pub match_urls: Vec<String>,
}

impl SchedulePage {
    /// Parse team links and match URLs out of a schedule page body.
    pub fn parse(url: &str, html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let pool_link_sel = parse_selector("div.pool a")?;
        let anchor_sel = parse_selector("a")?;

        let mut team_links = Vec::new();
        for anchor in document.select(&pool_link_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains("EventTeamId") {
                continue;
            }
            let label = anchor.text().collect::<String>().trim().to_string();
            team_links.push(TeamLink {
                href: href.to_string(),
                label,
            });
        }

        let mut seen = HashSet::new();
        let mut match_urls = Vec::new();
        for anchor in document.select(&anchor_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if href.contains("EventGameId") && seen.insert(href.to_string()) {
                match_urls.push(href.to_string());
            }
        }

        Ok(Self {
            url: url.to_string(),
            team_links,
            match_urls,
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"
        <html><body>
        <div class="pool">
          <a href="/teams/events/Eventteam/?EventTeamId=aaa">Rockets (1)</a>
          <a href="/teams/events/Eventteam/?EventTeamId=bbb">Comets (2)</a>
          <a href="/somewhere/else">Not a team</a>
        </div>
        <a href="/teams/events/match_report/?EventGameId=g1">12:30</a>
        <a href="/teams/events/match_report/?EventGameId=g2">14:00</a>
        <a href="/teams/events/match_report/?EventGameId=g1">12:30</a>
        <a href="/teams/events/Eventteam/?EventTeamId=ccc">Outside pool (9)</a>
        </body></html>
    "#;

    #[test]
    fn test_team_links_from_pools_only() {
        let page = SchedulePage::parse("http://x/schedule", SCHEDULE).unwrap();
        assert_eq!(page.team_links.len(), 2);
        assert_eq!(page.team_links[0].label, "Rockets (1)");
        assert!(page.team_links[0].href.contains("EventTeamId=aaa"));
    }

    #[test]
    fn test_match_urls_deduplicated() {
        let page = SchedulePage::parse("http://x/schedule", SCHEDULE).unwrap();
        assert_eq!(
            page.match_urls,
            [
                "/teams/events/match_report/?EventGameId=g1",
                "/teams/events/match_report/?EventGameId=g2",
            ]
        );
    }
}
