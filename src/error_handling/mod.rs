//! Error handling and retry classification.
//!
//! This module provides:
//! - Error type definitions for every layer of the resolver
//! - Retry strategy configuration for the raw content fetch
//! - Retriable-error classification
//!
//! Errors are categorized into:
//! - **Input errors**: user-correctable, reported as HTTP 400
//! - **Recovered errors**: decode and RPC failures, the orchestrator falls through
//! - **Network errors**: propagated only when no progress was made

mod categorization;
mod types;

// Re-export public API
pub use categorization::{get_retry_strategy, is_blocking_status, is_retriable_error};
pub use types::{
    DecodeError, FetchError, InitializationError, InputError, NetworkError, ResolveError,
    RpcError,
};
