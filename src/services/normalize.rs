//! Text normalizers for raw scraped strings.
//!
//! Best-effort by design: unexpected-but-well-formed input yields sentinel
//! values rather than errors. The one exception is `split_team_seed`, whose
//! failure marks a data quality problem at the source.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};

/// Capitalize the first letter of each name, but only when the whole string
/// is upper-case. Mixed-case surnames like "McCray" are left alone.
pub fn title_name(name: &str) -> String {
    let has_cased = name.chars().any(|c| c.is_alphabetic());
    let is_upper = has_cased && !name.chars().any(|c| c.is_lowercase());
    if !is_upper {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for grapheme in name.graphemes(true) {
        let alpha = grapheme
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic());
        if alpha && !prev_alpha {
            out.push_str(&grapheme.to_uppercase());
        } else if alpha {
            out.push_str(&grapheme.to_lowercase());
        } else {
            out.push_str(grapheme);
        }
        prev_alpha = alpha;
    }
    out
}

/// Split a "Team Name (N)" label into name and seed.
pub fn split_team_seed(text: &str) -> Result<(String, u32)> {
    let text = text.trim();
    let idx = text
        .rfind(" (")
        .ok_or_else(|| AppError::MalformedTeamLabel(text.to_string()))?;
    let name = &text[..idx];
    let seed = text[idx + 2..]
        .strip_suffix(')')
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| AppError::MalformedTeamLabel(text.to_string()))?;
    Ok((name.to_string(), seed))
}

/// Parse "Total: N" to N. A non-numeric trailing token falls back to 0; a
/// missing "Total:" prefix means the page shape is wrong and is an error.
pub fn split_total_score(text: &str) -> Result<i64> {
    let text = text.trim();
    if !text.starts_with("Total:") {
        return Err(AppError::scrape(
            "split_total_score",
            format!("missing 'Total:' prefix in {text:?}"),
        ));
    }
    Ok(text
        .split_whitespace()
        .last()
        .and_then(|tok| tok.parse().ok())
        .unwrap_or(0))
}

/// Parse "#N First Last" to N; -1 when there is no parseable number.
pub fn split_player_number(text: &str) -> i32 {
    let text = text.trim();
    if !text.starts_with('#') {
        return -1;
    }
    text.split_whitespace()
        .next()
        .and_then(|tok| tok[1..].parse().ok())
        .unwrap_or(-1)
}

/// Parse "#N First Last" to "First Last"; a string without the "#N" prefix
/// is already just the name.
pub fn split_player_name(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with('#') {
        return text;
    }
    match text.split_once(' ') {
        Some((_, name)) => name.trim(),
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_name_all_upper() {
        assert_eq!(title_name("JOHN MCCRAY"), "John Mccray");
    }

    #[test]
    fn test_title_name_mixed_case_unchanged() {
        assert_eq!(title_name("John McCray"), "John McCray");
        assert_eq!(title_name("de la Cruz"), "de la Cruz");
    }

    #[test]
    fn test_title_name_hyphenated() {
        assert_eq!(title_name("SMITH-JONES"), "Smith-Jones");
    }

    #[test]
    fn test_split_team_seed() {
        assert_eq!(
            split_team_seed("Carleton College (3)").unwrap(),
            ("Carleton College".to_string(), 3)
        );
        // Parenthesized team names split on the last " ("
        assert_eq!(
            split_team_seed("Slow White (Boston) (7)").unwrap(),
            ("Slow White (Boston)".to_string(), 7)
        );
    }

    #[test]
    fn test_split_team_seed_malformed() {
        assert!(matches!(
            split_team_seed("TBD"),
            Err(AppError::MalformedTeamLabel(_))
        ));
        assert!(split_team_seed("Team (x)").is_err());
    }

    #[test]
    fn test_split_total_score() {
        assert_eq!(split_total_score("Total: 15").unwrap(), 15);
        assert_eq!(split_total_score("Total: --").unwrap(), 0);
        assert_eq!(split_total_score("Total:").unwrap(), 0);
        assert!(split_total_score("15").is_err());
    }

    #[test]
    fn test_split_player_number() {
        assert_eq!(split_player_number("#7 Jane Doe"), 7);
        assert_eq!(split_player_number("Jane Doe"), -1);
        assert_eq!(split_player_number("#x Jane Doe"), -1);
    }

    #[test]
    fn test_split_player_name() {
        assert_eq!(split_player_name("#7 Jane Doe"), "Jane Doe");
        assert_eq!(split_player_name("Jane Doe"), "Jane Doe");
        assert_eq!(split_player_name("#7"), "");
    }
}
