//! Error type definitions.
//!
//! This module defines the error taxonomy of the resolver. Each layer recovers
//! from its own errors where it can; only `InputError` and genuinely unexpected
//! conditions reach the caller.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// User-correctable problems with the submitted URL (HTTP 400).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// No `url` was supplied.
    #[error("Missing 'url' parameter. Use GET /?url=https://example.com or POST with JSON body {{\"url\": \"https://example.com\"}}")]
    MissingUrl,

    /// The POST body was not a JSON object.
    #[error("Invalid JSON in request body")]
    InvalidJson,

    /// The URL could not be parsed as an absolute URL.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// The URL exceeds the accepted length.
    #[error("URL exceeds maximum length ({length} > {max})")]
    TooLong {
        /// Submitted length
        length: usize,
        /// Accepted maximum
        max: usize,
    },

    /// The URL uses a scheme other than http/https.
    #[error("Unsupported URL scheme '{0}': only http and https are allowed")]
    UnsupportedScheme(String),
}

/// The binary article-id decoder could not produce a URL.
///
/// Recovered locally by the orchestrator, which moves on to the next strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The article id is not base64.
    #[error("article id is not valid base64: {0}")]
    InvalidBase64(String),

    /// Nothing left after stripping the frame header and trailer.
    #[error("decoded frame is empty")]
    EmptyFrame,

    /// The payload is an opaque token only the batch-RPC endpoint can decode.
    #[error("article id carries an opaque token and needs RPC decoding")]
    NeedsRpcDecode,

    /// No URL-shaped payload anywhere in the frame.
    #[error("no URL found in decoded frame")]
    NoUrl,
}

impl DecodeError {
    /// Returns true when the caller should retry through the batch-RPC decoder.
    pub fn needs_rpc_decode(&self) -> bool {
        matches!(self, DecodeError::NeedsRpcDecode)
    }
}

/// The batch-RPC decode failed.
///
/// Recovered locally by falling back toward the canonical article URL.
#[derive(Error, Debug)]
pub enum RpcError {
    /// Transport failure or timeout talking to the endpoint.
    #[error("batch-RPC request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The endpoint answered with a non-success status.
    #[error("batch-RPC endpoint returned HTTP {0}")]
    Status(u16),

    /// Neither the structured parse nor the marker scan found a URL.
    #[error("batch-RPC response does not contain a result marker")]
    MarkerMissing,
}

/// The redirect chaser could not make any progress.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The first hop failed at the transport level (connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        /// URL of the failed hop
        url: String,
        /// Underlying transport error
        #[source]
        source: ReqwestError,
    },

    /// A `Location` header could not be resolved against the current URL.
    #[error("invalid redirect location '{location}' from {url}: {source}")]
    InvalidLocation {
        /// URL that answered with the redirect
        url: String,
        /// Raw `Location` value
        location: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
}

/// Errors surfaced by the resolution orchestrator.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The input was rejected before resolution started.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The redirect chaser failed before taking a single hop.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl ResolveError {
    /// Returns true for errors the caller can fix by changing the input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResolveError::Input(_))
    }
}

/// Errors from the raw content fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure after all attempts.
    #[error("{0}")]
    Request(#[from] ReqwestError),
}
