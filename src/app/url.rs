//! URL validation at the boundary.

use log::warn;
use reqwest::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::InputError;

/// Validates a submitted URL.
///
/// The URL must be absolute, at most `MAX_URL_LENGTH` bytes, use the http or
/// https scheme and carry a host. Unlike a crawler seed list, no scheme is
/// inferred: `example.com` is rejected.
///
/// # Errors
///
/// - `InputError::MissingUrl` for an empty or whitespace-only value
/// - `InputError::TooLong` above `MAX_URL_LENGTH`
/// - `InputError::InvalidUrl` if the value does not parse or has no host
/// - `InputError::UnsupportedScheme` for anything but http/https
pub fn validate_url(url: &str) -> Result<Url, InputError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(InputError::MissingUrl);
    }

    // Check length before parsing
    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            url.chars().take(50).collect::<String>()
        );
        return Err(InputError::TooLong {
            length: url.len(),
            max: MAX_URL_LENGTH,
        });
    }

    let parsed = Url::parse(url).map_err(|e| InputError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(InputError::UnsupportedScheme(other.to_string())),
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(InputError::InvalidUrl("URL has no host".to_string()));
    }

    Ok(parsed)
}
