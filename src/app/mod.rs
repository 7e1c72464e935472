//! Boundary input handling.
//!
//! This module validates URLs before they reach the resolver.

pub mod url;

// Re-export public API
pub use url::validate_url;
