//! Raw content fetch with retry on anti-bot walls.
//!
//! Unlike the resolver, which never retries, the raw fetch gives a blocked
//! target two more chances with exponential backoff before handing back
//! whatever it last received.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Serialize;
use tokio_retry::RetryIf;

use crate::error_handling::{get_retry_strategy, is_blocking_status, is_retriable_error, FetchError};
use crate::fetch::request::HeaderStrategy;

/// Processed body of a fetched URL, as returned by the fetch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchedContent {
    /// False when the body could not be processed
    pub success: bool,
    /// The requested URL
    pub url: String,
    /// Content type as reported upstream (`application/json` for JSON bodies)
    pub content_type: String,
    /// Parsed JSON, text, or base64 depending on the content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    /// `base64` for binary content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Upstream response headers
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Upstream status code
    pub status: u16,
    /// Processing failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Why a single attempt did not produce a usable response.
#[derive(Debug)]
enum AttemptFailure {
    /// 403/503: probably a bot wall, kept so it can be returned after the last attempt
    Blocked(reqwest::Response),
    Transport(reqwest::Error),
}

/// Fetches URLs with browser-like headers, retrying blocked attempts.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Arc<reqwest::Client>,
    headers: Arc<dyn HeaderStrategy>,
    retry_factor_ms: u64,
}

impl ContentFetcher {
    /// `client` follows redirects; `retry_factor_ms` scales the 2^n backoff.
    pub fn new(
        client: Arc<reqwest::Client>,
        headers: Arc<dyn HeaderStrategy>,
        retry_factor_ms: u64,
    ) -> Self {
        Self {
            client,
            headers,
            retry_factor_ms,
        }
    }

    /// GETs `url`, retrying on 403/503 and transient transport errors.
    ///
    /// After the final attempt a 403/503 response is returned as-is so the
    /// caller can report the upstream status.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` if the last attempt failed at the
    /// transport level, or the first one failed with a permanent error.
    pub async fn fetch(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        let attempt_count = Arc::new(AtomicU32::new(0));

        let result = RetryIf::spawn(
            get_retry_strategy(self.retry_factor_ms),
            {
                let attempt_count = Arc::clone(&attempt_count);
                move || {
                    attempt_count.fetch_add(1, Ordering::SeqCst);
                    let request = self.headers.apply(self.client.get(url.clone()), url);
                    async move {
                        match request.send().await {
                            Ok(response) if is_blocking_status(response.status().as_u16()) => {
                                Err(AttemptFailure::Blocked(response))
                            }
                            Ok(response) => Ok(response),
                            Err(e) => Err(AttemptFailure::Transport(e)),
                        }
                    }
                }
            },
            |failure: &AttemptFailure| match failure {
                AttemptFailure::Blocked(response) => {
                    log::debug!("Fetch of {} blocked with {}, retrying", url, response.status());
                    true
                }
                AttemptFailure::Transport(e) => is_retriable_error(e),
            },
        )
        .await;

        let attempts = attempt_count.load(Ordering::SeqCst);
        match result {
            Ok(response) => Ok(response),
            Err(AttemptFailure::Blocked(response)) => {
                log::warn!(
                    "Fetch of {} still blocked ({}) after {} attempts",
                    url,
                    response.status(),
                    attempts
                );
                Ok(response)
            }
            Err(AttemptFailure::Transport(e)) => {
                log::error!("Error fetching {} after {} attempts: {}", url, attempts, e);
                Err(FetchError::Request(e))
            }
        }
    }
}

/// Converts a response body into a [`FetchedContent`] by its content type.
///
/// JSON bodies are parsed, HTML and plain text are kept as text, anything
/// else is base64-encoded. A body that fails to read or parse yields
/// `success: false` with the failure message.
pub async fn process_content(response: reqwest::Response, url: &str) -> FetchedContent {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let lower = content_type.to_ascii_lowercase();
    let processed: Result<(String, serde_json::Value, Option<String>), String> =
        if lower.contains("application/json") {
            match response.bytes().await {
                Ok(bytes) => serde_json::from_slice(&bytes)
                    .map(|value| ("application/json".to_string(), value, None))
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            }
        } else if lower.contains("text/html") || lower.contains("text/plain") {
            response
                .text()
                .await
                .map(|text| (content_type.clone(), serde_json::Value::String(text), None))
                .map_err(|e| e.to_string())
        } else {
            response
                .bytes()
                .await
                .map(|bytes| {
                    (
                        content_type.clone(),
                        serde_json::Value::String(STANDARD.encode(&bytes)),
                        Some("base64".to_string()),
                    )
                })
                .map_err(|e| e.to_string())
        };

    match processed {
        Ok((reported_type, content, encoding)) => FetchedContent {
            success: true,
            url: url.to_string(),
            content_type: reported_type,
            content: Some(content),
            encoding,
            headers,
            status,
            error: None,
        },
        Err(message) => FetchedContent {
            success: false,
            url: url.to_string(),
            content_type,
            content: None,
            encoding: None,
            headers: BTreeMap::new(),
            status,
            error: Some(format!("Failed to process content: {message}")),
        },
    }
}
