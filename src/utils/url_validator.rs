//! Long URL and short code validation.
//!
//! A long URL is accepted when it parses as an absolute URL with an
//! `http`, `https`, `ftp` or `ftps` scheme, names a host (a dotted domain,
//! `localhost`, or an IP literal), contains no whitespace or control
//! characters, and is at most [`MAX_LONG_URL_LENGTH`] characters long. The
//! stored value is the caller's original string; the
//! parse is only used for checking.

use crate::error::AppError;
use serde_json::json;
use url::{Host, Url};

/// Maximum number of characters in a long URL.
pub const MAX_LONG_URL_LENGTH: usize = 2048;

/// Maximum number of characters in a short URL code.
pub const MAX_SHORT_URL_LENGTH: usize = 10;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Reasons a long URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Enter a valid URL.")]
    InvalidFormat,

    #[error("Only http, https, ftp and ftps URLs are allowed.")]
    UnsupportedScheme,

    #[error("URL length exceeds maximum allowed length of 2048 characters.")]
    TooLong,
}

/// Checks a long URL without modifying it.
///
/// # Errors
///
/// See [`UrlValidationError`] for the rejection reasons.
///
/// # Examples
///
/// ```ignore
/// assert!(check_long_url("https://example.com").is_ok());
/// assert_eq!(check_long_url("not-a-valid-url"), Err(UrlValidationError::InvalidFormat));
/// ```
pub fn check_long_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().count() > MAX_LONG_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    // Url::parse drops tabs and newlines and encodes spaces, so the raw
    // string would differ from what was checked.
    if input.is_empty() || input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::InvalidFormat);
    }

    let url = Url::parse(input).map_err(|_| UrlValidationError::InvalidFormat)?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlValidationError::UnsupportedScheme);
    }

    match url.host() {
        Some(Host::Domain(domain)) if is_acceptable_domain(domain) => Ok(()),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        _ => Err(UrlValidationError::InvalidFormat),
    }
}

fn is_acceptable_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain == "localhost" {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Validates a long URL, mapping failures to a field-level [`AppError`].
pub fn validate_long_url(input: &str) -> Result<(), AppError> {
    check_long_url(input).map_err(|e| {
        AppError::bad_request("Validation failed", json!({ "long_url": [e.to_string()] }))
    })
}

/// Validates a short URL code supplied on direct record construction.
pub fn validate_short_url(code: &str) -> Result<(), AppError> {
    let length = code.chars().count();

    if length == 0 {
        return Err(AppError::bad_request(
            "Validation failed",
            json!({ "short_url": ["This field may not be blank."] }),
        ));
    }

    if length > MAX_SHORT_URL_LENGTH {
        return Err(AppError::bad_request(
            "Validation failed",
            json!({
                "short_url": [format!(
                    "Ensure this field has no more than {MAX_SHORT_URL_LENGTH} characters."
                )],
                "provided_length": length,
            }),
        ));
    }

    Ok(())
}
