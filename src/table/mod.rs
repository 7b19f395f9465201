//! Reconstruction of structured rows from the plain-text tables printed
//! by database command-line tools.
//!
//! No client library is linked, so the console rendering is the only
//! channel available. Two formats exist in the wild: the bordered
//! `+---+---+` tables of the mysql and psql clients, and sqlite3's
//! space-padded column mode. Both parsers return `None` when no table
//! structure is discoverable; callers treat that as "plain text output",
//! not as an error.

use serde_json::Value;

use crate::execution::Row;

/// Cell conventions differ per tool: mysql prints SQL NULL as the bare
/// word `NULL`, psql leaves the cell blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullStyle {
    /// A cell whose trimmed text is exactly `NULL` becomes an explicit
    /// null. A string column literally storing the word "NULL" is
    /// indistinguishable from a true SQL null under this convention; that
    /// ambiguity is inherent to scraping mysql's console format.
    MySql,
    /// Blank cells map to the empty string; no marker word exists.
    Postgres,
}

/// Parse bordered `+---+---+` table output into rows.
///
/// The first content line after the first border is the header; content
/// lines between the second border and the closing border are data rows.
/// Anything after the closing border (psql's `(N rows)` footer) is
/// ignored. Returns `None` when no header can be found, `Some(vec![])`
/// for a well-formed table with zero rows.
pub fn parse_bordered(text: &str, null_style: NullStyle) -> Option<Vec<Row>> {
    let lines: Vec<&str> = text.lines().collect();
    let borders: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_border(line))
        .map(|(i, _)| i)
        .collect();
    if borders.len() < 2 {
        return None;
    }

    let header = lines[borders[0] + 1..borders[1]]
        .iter()
        .find(|line| !line.trim().is_empty())?;
    let columns: Vec<String> = split_cells(header)
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();
    if columns.is_empty() {
        return None;
    }

    let mut rows = Vec::new();
    if borders.len() >= 3 {
        let last = *borders.last().unwrap_or(&borders[1]);
        for line in &lines[borders[1] + 1..last] {
            if is_border(line) || line.trim().is_empty() {
                continue;
            }
            let cells = split_cells(line);
            let mut row = Row::new();
            for (name, cell) in columns.iter().zip(cells) {
                let value = match null_style {
                    NullStyle::MySql if cell == "NULL" => Value::Null,
                    _ => Value::String(cell),
                };
                row.insert(name.clone(), value);
            }
            rows.push(row);
        }
    }
    Some(rows)
}

/// Parse sqlite3 `-column` output: a header line of space-padded column
/// names, an optional dash-rule line, then space-padded data lines.
pub fn parse_column(text: &str) -> Option<Vec<Row>> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next()?;
    let spans = column_spans(header);
    if spans.is_empty() {
        return None;
    }
    let columns: Vec<String> = spans
        .iter()
        .map(|&(start, end)| slice_chars(header, start, end).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut first = true;
    for line in lines {
        // sqlite3 emits a rule of dashes under the header.
        if first {
            first = false;
            if line.chars().all(|c| c == '-' || c == ' ') {
                continue;
            }
        }
        let mut row = Row::new();
        for (name, &(start, end)) in columns.iter().zip(&spans) {
            let value = slice_chars(line, start, end).trim().to_string();
            row.insert(name.clone(), Value::String(value));
        }
        rows.push(row);
    }
    Some(rows)
}

/// A border line starts and ends with `+` and contains only `+` and `-`.
fn is_border(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2
        && trimmed.starts_with('+')
        && trimmed.ends_with('+')
        && trimmed.chars().all(|c| c == '+' || c == '-')
}

/// Split a `| a | b |` line into trimmed cells, dropping the artifacts of
/// the leading and trailing pipes but keeping interior blanks positional.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Maximal non-space runs of the header line. The rightmost column's end
/// is unbounded so values wider than the header word still land in it.
fn column_spans(header: &str) -> Vec<(usize, usize)> {
    let chars: Vec<char> = header.chars().collect();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut start = None;
    for (i, &c) in chars.iter().enumerate() {
        match (c == ' ', start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, chars.len()));
    }
    if let Some(last) = spans.last_mut() {
        last.1 = usize::MAX;
    }
    spans
}

/// Character-offset slicing so multi-byte values cannot split a code
/// point; `end` may exceed the line length.
fn slice_chars(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MYSQL_TABLE: &str = "\
+----+-------+
| id | name  |
+----+-------+
| 1  | ada   |
| 2  | NULL  |
+----+-------+
";

    #[test]
    fn bordered_rows_carry_every_column() {
        let rows = parse_bordered(MYSQL_TABLE, NullStyle::MySql).unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(row.contains_key("id"));
            assert!(row.contains_key("name"));
        }
        assert_eq!(rows[0]["name"], Value::String("ada".into()));
    }

    #[test]
    fn mysql_null_cell_becomes_explicit_null() {
        let rows = parse_bordered(MYSQL_TABLE, NullStyle::MySql).unwrap();
        assert_eq!(rows[1]["name"], Value::Null);
    }

    #[test]
    fn postgres_keeps_null_word_and_blank_cells_as_strings() {
        let text = "\
+----+-------+
| id | name  |
+----+-------+
| 1  | NULL  |
| 2  |       |
+----+-------+
(2 rows)
";
        let rows = parse_bordered(text, NullStyle::Postgres).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], Value::String("NULL".into()));
        assert_eq!(rows[1]["name"], Value::String(String::new()));
    }

    #[test]
    fn footer_after_closing_border_is_ignored() {
        let text = "\
+----+
| id |
+----+
| 1  |
+----+
(1 row)
";
        let rows = parse_bordered(text, NullStyle::Postgres).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], Value::String("1".into()));
    }

    #[test]
    fn header_with_zero_rows_yields_empty_sequence() {
        let text = "\
+----+-------+
| id | name  |
+----+-------+
";
        let rows = parse_bordered(text, NullStyle::MySql).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn no_discoverable_header_yields_none() {
        assert!(parse_bordered("Query OK, 1 row affected", NullStyle::MySql).is_none());
        assert!(parse_bordered("", NullStyle::MySql).is_none());
        assert!(parse_bordered("+----+\n+----+\n", NullStyle::MySql).is_none());
    }

    #[test]
    fn column_format_parses_header_rule_and_rows() {
        let text = "\
id          name
----------  ----------
1           ada
2           grace
";
        let rows = parse_column(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], Value::String("1".into()));
        assert_eq!(rows[1]["name"], Value::String("grace".into()));
    }

    #[test]
    fn column_format_rule_line_is_optional() {
        let text = "id    name\n1     ada\n";
        let rows = parse_column(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], Value::String("ada".into()));
    }

    #[test]
    fn rightmost_column_tolerates_wide_values() {
        let text = "\
id    name
----  ----
1     a very long value indeed
";
        let rows = parse_column(text).unwrap();
        assert_eq!(
            rows[0]["name"],
            Value::String("a very long value indeed".into())
        );
    }

    #[test]
    fn every_maximal_nonspace_run_is_its_own_column() {
        // Even single-space gaps split columns; the header scan keys off
        // maximal non-space runs, nothing smarter.
        let text = "\
id  tag note
1   a   b
";
        let rows = parse_column(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], Value::String("1".into()));
        assert_eq!(rows[0]["tag"], Value::String("a".into()));
        assert_eq!(rows[0]["note"], Value::String("b".into()));
    }

    #[test]
    fn empty_column_output_yields_none() {
        assert!(parse_column("").is_none());
        assert!(parse_column("   \n  \n").is_none());
    }
}
