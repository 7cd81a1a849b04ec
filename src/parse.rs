//! Line-based CSV parsing tuned for the loose exports this tool ingests.
//!
//! The files in the wild are not RFC 4180: quotes are used as a hint to
//! protect embedded commas, never escaped, and never span lines. The parser
//! therefore splits on lines first, tokenizes each line with a simple
//! quote toggle, and drops rows that are too short to cover the header.

use crate::error::{CatalogError, CatalogResult};

/// A parsed CSV document: one header row plus zero or more data rows.
#[derive(Debug, Clone)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse raw CSV text into a [`CsvDocument`].
///
/// Blank lines are skipped wherever they appear. The first non-blank line
/// is the header row. Data rows with fewer fields than the header are
/// silently discarded; rows with extra fields are kept as-is.
pub fn parse_csv(raw: &str) -> CatalogResult<CsvDocument> {
    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| CatalogError::Parse("document has no header row".into()))?;
    let headers = split_line(header_line);

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_line(line);
        if fields.len() < headers.len() {
            continue;
        }
        rows.push(fields);
    }

    Ok(CsvDocument { headers, rows })
}

/// Tokenize one line on commas, honoring double quotes.
///
/// A `"` flips the in-quotes state and is dropped from the output; commas
/// inside quotes do not split. Fields are trimmed. An unbalanced quote
/// simply swallows the rest of the line into the final field.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_line() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_quoted_comma() {
        assert_eq!(
            split_line("1,\"Hello, World\",Easy"),
            vec!["1", "Hello, World", "Easy"]
        );
    }

    #[test]
    fn test_split_trims_fields_and_strips_quotes() {
        assert_eq!(
            split_line("  1 , \"Two Sum\" ,  Easy  "),
            vec!["1", "Two Sum", "Easy"]
        );
    }

    #[test]
    fn test_split_empty_fields_preserved() {
        assert_eq!(split_line("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_split_unbalanced_quote_swallows_rest() {
        assert_eq!(split_line("a,\"b,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let doc = parse_csv("ID,Title\n\n1,Two Sum\n\n\n2,Add Two Numbers\n").unwrap();
        assert_eq!(doc.headers, vec!["ID", "Title"]);
        assert_eq!(doc.rows.len(), 2);
    }

    #[test]
    fn test_parse_drops_short_rows() {
        let doc = parse_csv("ID,Title,Difficulty\n1,Two Sum,Easy\n2,Oops\n").unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0], vec!["1", "Two Sum", "Easy"]);
    }

    #[test]
    fn test_parse_keeps_long_rows() {
        let doc = parse_csv("ID,Title\n1,Two Sum,extra,fields\n").unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].len(), 4);
    }

    #[test]
    fn test_parse_empty_document_is_error() {
        assert!(parse_csv("").is_err());
        assert!(parse_csv("\n\n  \n").is_err());
    }

    #[test]
    fn test_parse_header_only_document() {
        let doc = parse_csv("ID,Title,Difficulty\n").unwrap();
        assert!(doc.rows.is_empty());
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let doc = parse_csv("ID,Title\r\n1,Two Sum\r\n").unwrap();
        assert_eq!(doc.rows[0], vec!["1", "Two Sum"]);
    }
}
