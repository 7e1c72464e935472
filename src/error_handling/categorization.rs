//! Error categorization and retry strategy.
//!
//! Only the raw content fetch retries; the resolver layers never do.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{
    HTTP_STATUS_FORBIDDEN, HTTP_STATUS_SERVICE_UNAVAILABLE, RETRY_BACKOFF_BASE,
    RETRY_MAX_ATTEMPTS,
};

/// Creates the exponential backoff used between raw fetch attempts.
///
/// Delays are `RETRY_BACKOFF_BASE^n * factor_ms` milliseconds, so with the
/// production factor of 1000 the waits are 2s then 4s. The iterator yields
/// `RETRY_MAX_ATTEMPTS - 1` delays because the initial attempt is not a retry.
pub fn get_retry_strategy(factor_ms: u64) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_BACKOFF_BASE)
        .factor(factor_ms)
        .take(RETRY_MAX_ATTEMPTS.saturating_sub(1))
}

/// Returns true for statuses that typically mean an anti-bot wall or a
/// transient upstream overload (403 Forbidden, 503 Service Unavailable).
pub fn is_blocking_status(status: u16) -> bool {
    status == HTTP_STATUS_FORBIDDEN || status == HTTP_STATUS_SERVICE_UNAVAILABLE
}

/// Determines whether a transport error is worth another attempt.
///
/// Timeouts, connect failures and request-level failures are transient.
/// Builder, redirect and decode errors are permanent.
pub fn is_retriable_error(error: &reqwest::Error) -> bool {
    if error.is_builder() || error.is_redirect() || error.is_decode() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}
