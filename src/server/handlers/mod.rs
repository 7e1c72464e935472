//! HTTP handlers.

mod fetch;
mod resolve;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error_handling::InputError;

pub use fetch::{fetch_get, fetch_post};
pub use resolve::{resolve_get, resolve_post};

/// CORS preflight. The CORS headers themselves are added by the router layer.
pub async fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Reads `url` from a raw query string, percent-decoded.
fn url_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

/// Reads `url` from a JSON request body.
///
/// Returns `Ok(None)` for valid JSON without a string `url` field.
fn url_from_body(body: &Bytes) -> Result<Option<String>, InputError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| InputError::InvalidJson)?;
    Ok(value
        .get("url")
        .and_then(|url| url.as_str())
        .map(str::to_string))
}
