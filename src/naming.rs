//! Company identity derivation: file names to display names and slugs.

/// Lowercase `input` and collapse every non-alphanumeric run into a single
/// hyphen, with no leading or trailing hyphen.
///
/// Already-slugged input passes through unchanged, so deriving a slug from
/// a slug is idempotent.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derive a display name from a file name: strip any directory prefix and
/// the `.csv` extension, turn hyphens and underscores into spaces, and
/// title-case each word.
pub fn company_name_from_file(file_name: &str) -> String {
    let base = base_name(file_name).replace(['-', '_'], " ");
    title_case(&base)
}

/// Derive the canonical slug for a file name.
pub fn slug_from_file(file_name: &str) -> String {
    slugify(base_name(file_name))
}

fn base_name(file_name: &str) -> &str {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    strip_csv_extension(name)
}

fn strip_csv_extension(name: &str) -> &str {
    let len = name.len();
    if len >= 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".csv") {
        &name[..len - 4]
    } else {
        name
    }
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
    }

    #[test]
    fn test_slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("  Acme -- Corp!! "), "acme-corp");
        assert_eq!(slugify("...Acme..."), "acme");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        assert_eq!(slugify("acme-corp"), "acme-corp");
        assert_eq!(slugify(&slugify("Acme & Co.")), slugify("Acme & Co."));
    }

    #[test]
    fn test_slugify_all_punctuation_yields_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_company_name_from_file() {
        assert_eq!(company_name_from_file("acme_corp.csv"), "Acme Corp");
        assert_eq!(company_name_from_file("acme-corp.CSV"), "Acme Corp");
        assert_eq!(company_name_from_file("uploads/acme corp.csv"), "Acme Corp");
    }

    #[test]
    fn test_company_name_without_extension() {
        assert_eq!(company_name_from_file("acme"), "Acme");
    }

    #[test]
    fn test_slug_from_file_basic() {
        assert_eq!(slug_from_file("Acme Corp.csv"), "acme-corp");
    }

    #[test]
    fn test_slug_from_file_strips_directories() {
        assert_eq!(slug_from_file("a/b/Acme Corp.csv"), "acme-corp");
        assert_eq!(slug_from_file("a\\b\\Acme Corp.csv"), "acme-corp");
    }

    #[test]
    fn test_short_names_not_truncated() {
        assert_eq!(company_name_from_file("ibm.csv"), "Ibm");
        assert_eq!(slug_from_file("x.csv"), "x");
        assert_eq!(slug_from_file("csv"), "csv");
    }
}
