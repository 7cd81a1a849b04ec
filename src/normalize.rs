//! Row normalization: turning a tokenized CSV row into a [`Question`].
//!
//! Every field except the title is optional and gets a defined default, so
//! sparse exports still produce usable records. A row with no title carries
//! no information worth keeping and is dropped by returning `None`.

use crate::header::{FieldRole, RoleMap};
use crate::models::Question;

/// Values of the premium column that count as "yes", compared after
/// lowercasing. Everything else, including absence, means "no".
const PREMIUM_TOKENS: &[&str] = &["true", "y"];

const DEFAULT_DIFFICULTY: &str = "Medium";
const TOPIC_DELIMITER: char = ';';

/// Normalize one data row into a [`Question`].
///
/// `row_number` is the 1-based position of the row among the data rows and
/// seeds the synthesized `q-<n>` identifier when the file has no ID column.
/// Returns `None` when the title cell is missing or blank.
pub fn normalize_row(row: &[String], roles: &RoleMap, row_number: usize) -> Option<Question> {
    let field = |role: FieldRole| -> Option<&str> {
        roles
            .get(role)
            .and_then(|index| row.get(index))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    };

    let title = field(FieldRole::Title)?.to_string();

    let external_id = field(FieldRole::Id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("q-{row_number}"));

    let is_premium = field(FieldRole::Premium)
        .map(|value| {
            let lowered = value.to_lowercase();
            PREMIUM_TOKENS.iter().any(|token| lowered == *token)
        })
        .unwrap_or(false);

    let frequency = field(FieldRole::Frequency)
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(0);

    let topics = field(FieldRole::Topics)
        .map(|value| {
            value
                .split(TOPIC_DELIMITER)
                .map(str::trim)
                .filter(|topic| !topic.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Question {
        external_id,
        title,
        url: field(FieldRole::Url).unwrap_or("").to_string(),
        is_premium,
        acceptance: field(FieldRole::Acceptance).unwrap_or("").to_string(),
        difficulty: field(FieldRole::Difficulty)
            .unwrap_or(DEFAULT_DIFFICULTY)
            .to_string(),
        frequency,
        topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::resolve_headers;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn full_roles() -> RoleMap {
        resolve_headers(&row(&[
            "ID",
            "Title",
            "URL",
            "Is Premium",
            "Acceptance %",
            "Difficulty",
            "Frequency %",
            "Topics",
        ]))
    }

    #[test]
    fn test_normalize_full_row() {
        let q = normalize_row(
            &row(&[
                "1",
                "Two Sum",
                "https://example.com/two-sum",
                "true",
                "48.3%",
                "Easy",
                "95",
                "Array; Hash Table",
            ]),
            &full_roles(),
            1,
        )
        .unwrap();

        assert_eq!(q.external_id, "1");
        assert_eq!(q.title, "Two Sum");
        assert_eq!(q.url, "https://example.com/two-sum");
        assert!(q.is_premium);
        assert_eq!(q.acceptance, "48.3%");
        assert_eq!(q.difficulty, "Easy");
        assert_eq!(q.frequency, 95);
        assert_eq!(q.topics, vec!["Array", "Hash Table"]);
    }

    #[test]
    fn test_blank_title_drops_row() {
        let roles = full_roles();
        assert!(normalize_row(&row(&["1", "", "", "", "", "", "", ""]), &roles, 1).is_none());
        assert!(normalize_row(&row(&["1", "   ", "", "", "", "", "", ""]), &roles, 1).is_none());
    }

    #[test]
    fn test_missing_id_synthesizes_from_row_number() {
        let roles = resolve_headers(&row(&["Title"]));
        let q = normalize_row(&row(&["Two Sum"]), &roles, 7).unwrap();
        assert_eq!(q.external_id, "q-7");
    }

    #[test]
    fn test_defaults_for_sparse_row() {
        let roles = resolve_headers(&row(&["Title"]));
        let q = normalize_row(&row(&["Two Sum"]), &roles, 1).unwrap();
        assert_eq!(q.url, "");
        assert!(!q.is_premium);
        assert_eq!(q.acceptance, "");
        assert_eq!(q.difficulty, "Medium");
        assert_eq!(q.frequency, 0);
        assert!(q.topics.is_empty());
    }

    #[test]
    fn test_premium_tokens() {
        let roles = resolve_headers(&row(&["Title", "Premium"]));
        for token in ["true", "TRUE", "Y", "y"] {
            let q = normalize_row(&row(&["A", token]), &roles, 1).unwrap();
            assert!(q.is_premium, "token {token:?} should mark premium");
        }
        for token in ["false", "no", "N", "1", "yes"] {
            let q = normalize_row(&row(&["A", token]), &roles, 1).unwrap();
            assert!(!q.is_premium, "token {token:?} should not mark premium");
        }
    }

    #[test]
    fn test_non_numeric_frequency_defaults_to_zero() {
        let roles = resolve_headers(&row(&["Title", "Frequency"]));
        let q = normalize_row(&row(&["A", "often"]), &roles, 1).unwrap();
        assert_eq!(q.frequency, 0);
    }

    #[test]
    fn test_topics_split_trim_and_drop_empties() {
        let roles = resolve_headers(&row(&["Title", "Topics"]));
        let q = normalize_row(&row(&["A", " Array ;; Hash Table ; "]), &roles, 1).unwrap();
        assert_eq!(q.topics, vec!["Array", "Hash Table"]);
    }

    #[test]
    fn test_difficulty_kept_verbatim() {
        let roles = resolve_headers(&row(&["Title", "Difficulty"]));
        let q = normalize_row(&row(&["A", "easy"]), &roles, 1).unwrap();
        assert_eq!(q.difficulty, "easy");
    }
}
