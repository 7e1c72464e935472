//! Server state and response types.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::config::{Config, RETRY_FACTOR_MS};
use crate::error_handling::{InitializationError, InputError, ResolveError};
use crate::fetch::ContentFetcher;
use crate::initialization::{init_client, init_header_strategy};
use crate::resolver::Resolver;

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Resolver behind `/` and `/resolve`
    pub resolver: Arc<Resolver>,
    /// Fetcher behind `/fetch`
    pub fetcher: Arc<ContentFetcher>,
}

impl ServerState {
    /// Wraps a resolver and fetcher for sharing across handlers.
    pub fn new(resolver: Resolver, fetcher: ContentFetcher) -> Self {
        Self {
            resolver: Arc::new(resolver),
            fetcher: Arc::new(fetcher),
        }
    }

    /// Builds the production resolver and fetcher from `config`.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let resolver = Resolver::from_config(config)?;
        let fetcher = ContentFetcher::new(
            init_client(config)?,
            init_header_strategy(config),
            RETRY_FACTOR_MS,
        );
        Ok(Self::new(resolver, fetcher))
    }
}

/// JSON error body: `{ "error": "..." }`, plus the target and upstream status
/// when a fetch was refused upstream.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Target URL, for upstream failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upstream status, for refused fetches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// An error response with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status of the response
    pub status: StatusCode,
    /// JSON body
    pub body: ErrorResponse,
}

impl ApiError {
    /// Creates an error with `status` and message `error`.
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                url: None,
                status: None,
            },
        }
    }

    /// Attaches the target URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.body.url = Some(url.into());
        self
    }

    /// Attaches the upstream status code.
    pub fn with_upstream_status(mut self, status: u16) -> Self {
        self.body.status = Some(status);
        self
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        ApiError::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
