//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP clients (redirect-following and manual-redirect)
//! - The outbound header strategy
//! - Logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, init_header_strategy, init_redirect_client};
pub use logger::init_logger_with;
