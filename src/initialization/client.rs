//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients with proper
//! configuration for content fetches and manual redirect handling.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::fetch::{BrowserHeaders, FixedHeaders, HeaderStrategy};

/// Initializes the HTTP client used for raw content fetches.
///
/// Creates a `reqwest::Client` configured with:
/// - Timeout from the config
/// - Redirect following enabled (up to `max_hops`)
/// - Rustls TLS backend (no native TLS)
///
/// The User-Agent is not set here; every request carries one from the
/// configured header strategy.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(config.max_hops))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes a shared HTTP client for redirect resolution.
///
/// Creates a `reqwest::Client` with redirects disabled so the redirect chaser,
/// the HEAD probe and the batch-RPC decoder see every 3xx response themselves.
/// Individual calls may tighten the timeout (RPC and HEAD probes use the
/// shorter `rpc_timeout_seconds`).
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_redirect_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the header strategy applied to every outbound GET.
///
/// A pinned `--user-agent` selects [`FixedHeaders`]; otherwise requests get
/// rotating [`BrowserHeaders`], with the random `X-Forwarded-For` when
/// `spoof_forwarded_for` is set.
pub fn init_header_strategy(config: &Config) -> Arc<dyn HeaderStrategy> {
    match &config.user_agent {
        Some(user_agent) => Arc::new(FixedHeaders::new(user_agent.clone())),
        None => Arc::new(BrowserHeaders::default().with_forwarded_for(config.spoof_forwarded_for)),
    }
}
