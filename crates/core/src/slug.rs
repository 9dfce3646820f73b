//! Slug normalization for portfolio and technology slugs.
//!
//! Rules: trim, lowercase, whitespace to hyphens, keep `[a-z0-9-]`,
//! collapse runs of hyphens, trim hyphens from both ends.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn invalid_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\-]").expect("static regex"))
}

fn hyphen_runs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("static regex"))
}

/// Normalize a raw slug candidate. Returns an empty string when nothing
/// usable survives normalization; callers decide whether that is an error.
pub fn normalize(raw: &str) -> String {
    let s = raw.trim().to_lowercase();
    let s = whitespace_re().replace_all(&s, "-");
    let s = invalid_chars_re().replace_all(&s, "");
    let s = hyphen_runs_re().replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

/// Normalize a display name: trim and collapse internal whitespace runs to
/// a single space.
pub fn normalize_name(raw: &str) -> String {
    whitespace_re().replace_all(raw.trim(), " ").to_string()
}

/// Derive a slug from a display name, failing when nothing usable survives.
pub fn from_name(name: &str) -> Result<String, CoreError> {
    let slug = normalize(name);
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Generated slug is empty; provide a name with letters or digits".into(),
        ));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(normalize("  Ada Lovelace "), "ada-lovelace");
    }

    #[test]
    fn strips_invalid_characters() {
        assert_eq!(normalize("c++ & rust!"), "c-rust");
    }

    #[test]
    fn collapses_hyphen_runs_and_trims_ends() {
        assert_eq!(normalize("--a---b--"), "a-b");
    }

    #[test]
    fn empty_after_normalization() {
        assert_eq!(normalize("!!!"), "");
        assert!(from_name("???").is_err());
    }

    #[test]
    fn name_whitespace_collapses() {
        assert_eq!(normalize_name("  Rust   Backend \t Kit "), "Rust Backend Kit");
    }

    #[test]
    fn from_name_generates_technology_slugs() {
        assert_eq!(from_name("ASP.NET Core").unwrap(), "aspnet-core");
        assert_eq!(from_name("Vue.js 3").unwrap(), "vuejs-3");
    }
}
