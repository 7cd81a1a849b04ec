//! Header resolution: mapping the semantic fields the catalog cares about
//! onto whatever column names a given export uses.
//!
//! Exports disagree on header spelling ("Title" vs "Question", "URL" vs
//! "Leetcode Question Link"), so resolution is deliberately loose: exact
//! matches are tried first for the roles where a bare name is unambiguous,
//! then a case-insensitive substring scan fills in the rest. The first
//! matching column wins; later duplicates are ignored.

/// The semantic roles a CSV column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Id,
    Title,
    Url,
    Premium,
    Acceptance,
    Difficulty,
    Frequency,
    Topics,
}

const ROLE_COUNT: usize = 8;

/// Resolved mapping from [`FieldRole`] to a column index.
///
/// Roles with no matching column are simply absent; the normalizer applies
/// per-field defaults for those.
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    indices: [Option<usize>; ROLE_COUNT],
}

impl RoleMap {
    pub fn get(&self, role: FieldRole) -> Option<usize> {
        self.indices[role as usize]
    }

    fn set_if_unset(&mut self, role: FieldRole, index: usize) {
        let slot = &mut self.indices[role as usize];
        if slot.is_none() {
            *slot = Some(index);
        }
    }
}

/// Exact header names per role, matched case-insensitively.
///
/// `Id` is exact-only: a substring scan would latch onto any header that
/// merely contains the letters "id".
const EXACT_NAMES: &[(FieldRole, &[&str])] = &[
    (FieldRole::Id, &["id"]),
    (FieldRole::Title, &["title", "question"]),
    (FieldRole::Difficulty, &["difficulty"]),
];

/// Substring fragments per role, for the tolerant second pass.
const SUBSTRING_NAMES: &[(FieldRole, &[&str])] = &[
    (FieldRole::Title, &["title"]),
    (FieldRole::Url, &["url", "link"]),
    (FieldRole::Premium, &["premium"]),
    (FieldRole::Acceptance, &["acceptance"]),
    (FieldRole::Difficulty, &["difficulty"]),
    (FieldRole::Frequency, &["frequency"]),
    (FieldRole::Topics, &["topic"]),
];

/// Map header columns to field roles.
pub fn resolve_headers(headers: &[String]) -> RoleMap {
    let lowered: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut roles = RoleMap::default();

    for (role, names) in EXACT_NAMES {
        for (index, header) in lowered.iter().enumerate() {
            if names.iter().any(|name| header == name) {
                roles.set_if_unset(*role, index);
                break;
            }
        }
    }

    for (role, fragments) in SUBSTRING_NAMES {
        if roles.get(*role).is_some() {
            continue;
        }
        for (index, header) in lowered.iter().enumerate() {
            if fragments.iter().any(|frag| header.contains(frag)) {
                roles.set_if_unset(*role, index);
                break;
            }
        }
    }

    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_canonical_headers() {
        let roles = resolve_headers(&headers(&[
            "ID",
            "Title",
            "URL",
            "Is Premium",
            "Acceptance %",
            "Difficulty",
            "Frequency %",
            "Topics",
        ]));
        assert_eq!(roles.get(FieldRole::Id), Some(0));
        assert_eq!(roles.get(FieldRole::Title), Some(1));
        assert_eq!(roles.get(FieldRole::Url), Some(2));
        assert_eq!(roles.get(FieldRole::Premium), Some(3));
        assert_eq!(roles.get(FieldRole::Acceptance), Some(4));
        assert_eq!(roles.get(FieldRole::Difficulty), Some(5));
        assert_eq!(roles.get(FieldRole::Frequency), Some(6));
        assert_eq!(roles.get(FieldRole::Topics), Some(7));
    }

    #[test]
    fn test_resolve_alternate_spellings() {
        let roles = resolve_headers(&headers(&[
            "Question",
            "Leetcode Question Link",
            "Topic Tags",
        ]));
        assert_eq!(roles.get(FieldRole::Title), Some(0));
        assert_eq!(roles.get(FieldRole::Url), Some(1));
        assert_eq!(roles.get(FieldRole::Topics), Some(2));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let roles = resolve_headers(&headers(&["id", "TITLE", "difficulty"]));
        assert_eq!(roles.get(FieldRole::Id), Some(0));
        assert_eq!(roles.get(FieldRole::Title), Some(1));
        assert_eq!(roles.get(FieldRole::Difficulty), Some(2));
    }

    #[test]
    fn test_id_does_not_match_by_substring() {
        // "Video" contains "id"; only an exact "ID" header may claim the role.
        let roles = resolve_headers(&headers(&["Video", "Title"]));
        assert_eq!(roles.get(FieldRole::Id), None);
    }

    #[test]
    fn test_exact_title_beats_earlier_substring() {
        let roles = resolve_headers(&headers(&["Subtitle", "Title"]));
        assert_eq!(roles.get(FieldRole::Title), Some(1));
    }

    #[test]
    fn test_first_match_wins_for_duplicates() {
        let roles = resolve_headers(&headers(&["URL", "Backup URL"]));
        assert_eq!(roles.get(FieldRole::Url), Some(0));
    }

    #[test]
    fn test_missing_roles_stay_unresolved() {
        let roles = resolve_headers(&headers(&["Title"]));
        assert_eq!(roles.get(FieldRole::Frequency), None);
        assert_eq!(roles.get(FieldRole::Premium), None);
    }
}
