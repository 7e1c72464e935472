//! Outbound HTTP: request shaping, redirect chasing and raw content fetch.
//!
//! This module provides:
//! - Pluggable header strategies applied to every outbound GET
//! - The manual redirect chaser with scrape-assisted hops
//! - The retrying raw content fetch behind the `/fetch` endpoint

mod content;
mod redirects;
mod request;

pub use content::{process_content, ContentFetcher, FetchedContent};
pub use redirects::{RedirectChain, RedirectChaser};
pub use request::{BrowserHeaders, FixedHeaders, HeaderStrategy};
