//! Slug derivation and validation for project URLs.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. They are derived deterministically from a
//! project name: lowercase, non-alphanumerics become hyphens, runs of
//! hyphens collapse, and leading/trailing hyphens are trimmed.

/// Derive a URL-safe slug from a human-readable project name.
///
/// Returns `None` when nothing slug-worthy remains, e.g. a name made
/// entirely of punctuation.
///
/// # Examples
/// ```
/// use shipnotes::domain::slug::slugify;
///
/// assert_eq!(slugify("My App!"), Some("my-app".to_owned()));
/// assert_eq!(slugify("---"), None);
/// ```
pub fn slugify(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = false;
    for ch in name.chars() {
        let lowered = ch.to_ascii_lowercase();
        if lowered.is_ascii_lowercase() || lowered.is_ascii_digit() {
            slug.push(lowered);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Return `true` when `value` is a valid project slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("My App", "my-app")]
    #[case("my-app", "my-app")]
    #[case("  Ship  Notes  ", "ship-notes")]
    #[case("v2.0 (beta)", "v2-0-beta")]
    #[case("Already-Slugged-123", "already-slugged-123")]
    fn derives_expected_slug(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name).as_deref(), Some(expected));
    }

    #[test]
    fn names_that_normalize_identically_collide() {
        assert_eq!(slugify("My App"), slugify("my-app"));
    }

    #[rstest]
    #[case("")]
    #[case("---")]
    #[case("!!!")]
    fn rejects_empty_derivations(#[case] name: &str) {
        assert_eq!(slugify(name), None);
    }

    #[rstest]
    #[case("my-app", true)]
    #[case("My-App", false)]
    #[case("my app", false)]
    #[case("", false)]
    fn validates_slugs(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_slug(value), expected);
    }
}
