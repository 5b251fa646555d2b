//! Utility functions and helpers.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("http://play.usaultimate.org/events/x/").unwrap();
        assert_eq!(
            resolve_url(&base, "/teams/events/Eventteam/?EventTeamId=abc"),
            "http://play.usaultimate.org/teams/events/Eventteam/?EventTeamId=abc"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }
}
