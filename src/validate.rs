use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::api::ShortenRequest;

/// Path segments owned by the service's own routes.
pub const RESERVED_CODES: [&str; 4] = ["docs", "shorten", "resolve", "static"];

static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://[^/\s]+\.[A-Za-z]{2,}(?:[/?#].*)?$").expect("URL pattern compiles")
});

static CUSTOM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]{2,64}$").expect("code pattern compiles"));

/// The `Display` impl is the message shown to the user.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a URL.")]
    MissingUrl,
    #[error("Enter a valid URL like https://example.com")]
    InvalidUrl,
    #[error("That custom code is reserved.")]
    ReservedCode,
    #[error("Custom code must be 2-64 characters: letters and digits only.")]
    InvalidCustomCode,
    #[error("Please enter a code.")]
    MissingCode,
}

#[must_use]
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Builds the shorten request from raw field values.
///
/// Checks run in a fixed order: emptiness, URL shape, reserved code, code
/// shape. An empty custom code field means "let the service pick".
///
/// # Errors
/// Returns the first [`ValidationError`] the input trips over.
pub fn shorten_request(
    raw_url: &str,
    raw_custom_code: Option<&str>,
) -> Result<ShortenRequest, ValidationError> {
    let url = raw_url.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    if !HTTPS_URL.is_match(url) {
        return Err(ValidationError::InvalidUrl);
    }

    let custom_code = raw_custom_code.map(str::trim).filter(|code| !code.is_empty());
    if let Some(code) = custom_code {
        if is_reserved_code(code) {
            return Err(ValidationError::ReservedCode);
        }
        if !CUSTOM_CODE.is_match(code) {
            return Err(ValidationError::InvalidCustomCode);
        }
    }

    Ok(ShortenRequest {
        url: url.to_owned(),
        custom_code: custom_code.map(str::to_owned),
    })
}

/// # Errors
/// Returns [`ValidationError::MissingCode`] when nothing but whitespace was entered.
pub fn resolve_code(raw_code: &str) -> Result<&str, ValidationError> {
    match raw_code.trim() {
        "" => Err(ValidationError::MissingCode),
        code => Ok(code),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_urls() {
        for url in [
            "https://example.com",
            "https://example.com/",
            "https://sub.example.co.uk/path?q=1#frag",
            "https://example.com?x=y",
            "https://user@example.org#top",
            "  https://example.com/padded  ",
        ] {
            let request = shorten_request(url, None).unwrap();
            assert_eq!(request.url, url.trim());
            assert_eq!(request.custom_code, None);
        }
    }

    #[test]
    fn test_rejects_non_https_urls() {
        for url in [
            "http://example.com",
            "example.com",
            "https://localhost",
            "https://example.c0m",
            "https://example.c",
            "https://exa mple.com",
            "ftp://example.com",
            "https://example.com:8080",
        ] {
            assert_eq!(
                shorten_request(url, None).unwrap_err(),
                ValidationError::InvalidUrl,
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_url_wins_over_everything() {
        assert_eq!(
            shorten_request("   ", Some("docs")).unwrap_err(),
            ValidationError::MissingUrl
        );
        assert_eq!(ValidationError::MissingUrl.to_string(), "Please enter a URL.");
    }

    #[test]
    fn test_url_checked_before_code() {
        assert_eq!(
            shorten_request("not a url", Some("!")).unwrap_err(),
            ValidationError::InvalidUrl
        );
        assert_eq!(
            ValidationError::InvalidUrl.to_string(),
            "Enter a valid URL like https://example.com"
        );
    }

    #[test]
    fn test_reserved_codes_rejected_case_insensitively() {
        for code in ["docs", "SHORTEN", "Resolve", "sTaTiC", " docs "] {
            assert_eq!(
                shorten_request("https://example.com", Some(code)).unwrap_err(),
                ValidationError::ReservedCode
            );
        }
        assert_eq!(
            ValidationError::ReservedCode.to_string(),
            "That custom code is reserved."
        );
    }

    #[test]
    fn test_custom_code_shape() {
        let too_long = "a".repeat(65);
        for code in ["a", "ab-c", "ab_c", "päivä", too_long.as_str()] {
            assert_eq!(
                shorten_request("https://example.com", Some(code)).unwrap_err(),
                ValidationError::InvalidCustomCode,
                "{code} should be rejected"
            );
        }
        assert_eq!(
            ValidationError::InvalidCustomCode.to_string(),
            "Custom code must be 2-64 characters: letters and digits only."
        );

        let longest = "Z9".repeat(32);
        let request = shorten_request("https://example.com", Some(&longest)).unwrap();
        assert_eq!(request.custom_code.as_deref(), Some(longest.as_str()));
    }

    #[test]
    fn test_blank_custom_code_is_omitted() {
        let request = shorten_request("https://example.com", Some("   ")).unwrap();
        assert_eq!(request.custom_code, None);
    }

    #[test]
    fn test_custom_code_is_trimmed() {
        let request = shorten_request("https://example.com", Some(" ab12 ")).unwrap();
        assert_eq!(request.custom_code.as_deref(), Some("ab12"));
    }

    #[test]
    fn test_resolve_code() {
        assert_eq!(resolve_code("  abc123 ").unwrap(), "abc123");
        assert_eq!(resolve_code(" \t").unwrap_err(), ValidationError::MissingCode);
        assert_eq!(ValidationError::MissingCode.to_string(), "Please enter a code.");
    }
}
