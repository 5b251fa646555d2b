//! HTML table extraction and match-report normalization.
//!
//! Tables are kept as rectangles of trimmed cell text until a scraper maps
//! them onto typed rows.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::services::normalize::{split_player_name, split_player_number, title_name};

/// Columns present after match-report normalization. Their presence marks a
/// table as already normalized.
const REPORT_COLUMNS: [&str; 7] = ["No.", "Name", "UpperName", "Gs", "As", "Ds", "Ts"];

/// A rectangular slice of an HTML table: header row plus body rows of
/// whitespace-collapsed cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the column with the given header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column matching any of the given header names.
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column(name))
    }

    /// Cell text at (row, column); empty string when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// True when `el`'s nearest ancestor with tag `ancestor_name` is `expected`.
/// Keeps nested tables from leaking rows/cells into their ancestors.
fn belongs_to(el: ElementRef<'_>, ancestor_name: &str, expected: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == ancestor_name)
        .is_some_and(|a| a.id() == expected.id())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract every table in `html` whose cell text contains `pattern`.
///
/// `header_row = Some(i)` makes row `i` the header and everything after it
/// the body; `None` auto-detects a leading `<th>` row (tables without one
/// have an empty header and all rows as body).
pub fn extract_tables(html: &str, pattern: &str, header_row: Option<usize>) -> Result<Vec<Table>> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector("table")?;
    let tr_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("th, td")?;

    let mut tables = Vec::new();
    for table_el in document.select(&table_sel) {
        let mut raw_rows: Vec<(Vec<String>, bool)> = Vec::new();
        for tr in table_el.select(&tr_sel) {
            if !belongs_to(tr, "table", &table_el) {
                continue;
            }
            let mut cells = Vec::new();
            let mut has_th = false;
            for cell in tr.select(&cell_sel) {
                if !belongs_to(cell, "tr", &tr) {
                    continue;
                }
                has_th |= cell.value().name() == "th";
                cells.push(collapse_whitespace(&cell.text().collect::<String>()));
            }
            if !cells.is_empty() {
                raw_rows.push((cells, has_th));
            }
        }

        let matches = raw_rows
            .iter()
            .any(|(cells, _)| cells.iter().any(|c| c.contains(pattern)));
        if !matches {
            continue;
        }

        let header_index = match header_row {
            Some(i) => (i < raw_rows.len()).then_some(i),
            None => raw_rows.first().is_some_and(|(_, th)| *th).then_some(0),
        };
        let table = match header_index {
            Some(i) => Table {
                headers: raw_rows[i].0.clone(),
                rows: raw_rows[i + 1..].iter().map(|(c, _)| c.clone()).collect(),
            },
            None => Table {
                headers: Vec::new(),
                rows: raw_rows.into_iter().map(|(c, _)| c).collect(),
            },
        };
        tables.push(table);
    }
    Ok(tables)
}

/// Normalize a raw match-report table in place: split the "Players" column
/// into `No.` / `Name` / `UpperName`, rename `G/A/D/T` to `Gs/As/Ds/Ts`, and
/// drop the source columns. Idempotent: an already-normalized table is left
/// untouched.
pub fn clean_report_table(table: &mut Table) -> Result<()> {
    if REPORT_COLUMNS.iter().all(|c| table.column(c).is_some()) {
        return Ok(());
    }

    let required = ["Players", "G", "A", "D", "T"];
    let mut source = [0usize; 5];
    for (slot, name) in source.iter_mut().zip(required) {
        *slot = table.column(name).ok_or_else(|| {
            AppError::scrape("clean_report_table", format!("missing column {name:?}"))
        })?;
    }
    let [players, g, a, d, t] = source;

    let kept: Vec<usize> = (0..table.headers.len())
        .filter(|i| !source.contains(i))
        .collect();

    let mut headers: Vec<String> = REPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
    headers.extend(kept.iter().map(|&i| table.headers[i].clone()));

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cell = |i: usize| row.get(i).map_or("", String::as_str);
            let raw = cell(players);
            let name = title_name(split_player_name(raw));
            let mut out = vec![
                split_player_number(raw).to_string(),
                name.clone(),
                name.to_uppercase(),
                cell(g).to_string(),
                cell(a).to_string(),
                cell(d).to_string(),
                cell(t).to_string(),
            ];
            out.extend(kept.iter().map(|&i| cell(i).to_string()));
            out
        })
        .collect();

    table.headers = headers;
    table.rows = rows;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table>
          <tr><th>No.</th><th>Name</th><th>Position</th></tr>
          <tr><td>7</td><td>JANE DOE</td><td>Handler</td></tr>
        </table>
        <table>
          <tr><td>Rockets (1)</td><td>1</td><td>Total: 2</td></tr>
          <tr><td>Comets (2)</td><td>0</td><td>Total: 1</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_pattern_filters_tables() {
        let tables = extract_tables(PAGE, "Position", None).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, ["No.", "Name", "Position"]);
        assert_eq!(tables[0].cell(0, 1), "JANE DOE");

        assert!(extract_tables(PAGE, "Nothing Here", None).unwrap().is_empty());
    }

    #[test]
    fn test_headerless_table_keeps_all_rows() {
        let tables = extract_tables(PAGE, "Total:", None).unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].headers.is_empty());
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].cell(0, 0), "Rockets (1)");
        assert_eq!(tables[0].cell(1, 2), "Total: 1");
    }

    #[test]
    fn test_explicit_header_row() {
        let html = r#"
            <table>
              <tr><td>Players</td><td>G</td></tr>
              <tr><td>#7 Jane Doe</td><td>3</td></tr>
            </table>
        "#;
        let tables = extract_tables(html, "Players", Some(0)).unwrap();
        assert_eq!(tables[0].headers, ["Players", "G"]);
        assert_eq!(tables[0].rows.len(), 1);
    }

    #[test]
    fn test_nested_table_rows_do_not_leak() {
        let html = r#"
            <table>
              <tr><td>outer marker</td></tr>
              <tr><td><table><tr><td>inner</td></tr></table></td></tr>
            </table>
        "#;
        let tables = extract_tables(html, "marker", None).unwrap();
        assert_eq!(tables.len(), 1);
        // The outer table keeps its own two rows; the inner row shows up
        // only in the nested table, which doesn't match the pattern.
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].cell(0, 0), "outer marker");
    }

    fn raw_report_table() -> Table {
        Table {
            headers: vec!["Players", "G", "A", "D", "T"]
                .into_iter()
                .map(String::from)
                .collect(),
            rows: vec![
                vec!["#7 JANE DOE", "3", "1", "0", "2"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                vec!["Sam Smith", "0", "4", "1", "0"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ],
        }
    }

    #[test]
    fn test_clean_report_table() {
        let mut table = raw_report_table();
        clean_report_table(&mut table).unwrap();
        assert_eq!(
            table.headers,
            ["No.", "Name", "UpperName", "Gs", "As", "Ds", "Ts"]
        );
        assert_eq!(table.rows[0], ["7", "Jane Doe", "JANE DOE", "3", "1", "0", "2"]);
        assert_eq!(table.rows[1], ["-1", "Sam Smith", "SAM SMITH", "0", "4", "1", "0"]);
    }

    #[test]
    fn test_clean_report_table_idempotent() {
        let mut once = raw_report_table();
        clean_report_table(&mut once).unwrap();
        let mut twice = once.clone();
        clean_report_table(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_report_table_missing_column() {
        let mut table = Table {
            headers: vec!["Players".to_string(), "G".to_string()],
            rows: vec![],
        };
        assert!(clean_report_table(&mut table).is_err());
    }
}
