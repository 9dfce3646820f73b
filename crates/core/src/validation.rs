//! Input-shape validation for project content fields.

use url::Url;

use crate::error::CoreError;

/// Validate that a required text field is present and non-blank.
pub fn require_non_blank(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate that an optional URL, when present, is an absolute http(s) URL.
pub fn validate_optional_url(value: Option<&str>, field: &str) -> Result<(), CoreError> {
    let Some(raw) = value else {
        return Ok(());
    };
    if raw.trim().is_empty() {
        return Ok(());
    }

    let parsed = Url::parse(raw)
        .map_err(|_| CoreError::Validation(format!("Invalid URL format for {field}: {raw}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CoreError::Validation(format!(
            "{field} must use http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert!(require_non_blank("  ", "name").is_err());
        assert!(require_non_blank("ok", "name").is_ok());
    }

    #[test]
    fn absent_url_is_fine() {
        assert!(validate_optional_url(None, "live_url").is_ok());
        assert!(validate_optional_url(Some(""), "live_url").is_ok());
    }

    #[test]
    fn relative_url_is_rejected() {
        assert!(validate_optional_url(Some("/somewhere"), "live_url").is_err());
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(validate_optional_url(Some("ftp://example.com"), "repo_url").is_err());
    }

    #[test]
    fn https_url_is_accepted() {
        assert!(validate_optional_url(Some("https://example.com/repo"), "repo_url").is_ok());
    }
}
