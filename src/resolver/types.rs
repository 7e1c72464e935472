//! Resolution result types.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter as EnumIterMacro;

/// How the final URL was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIterMacro)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// A Google News article resolved by the binary decoder, the batch-RPC
    /// decoder or the HEAD probe
    GoogleNewsDecode,
    /// Followed HTTP redirects (and scraped interstitials)
    StandardRedirect,
    /// A Google News article nothing could resolve; the canonical article URL
    /// is returned
    Passthrough,
}

impl ResolutionMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionMethod::GoogleNewsDecode => "google_news_decode",
            ResolutionMethod::StandardRedirect => "standard_redirect",
            ResolutionMethod::Passthrough => "passthrough",
        }
    }
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy's answer before it is tied to the original URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Destination found by the strategy
    pub final_url: String,
    /// Status to report for it
    pub status_code: u16,
    /// Hops the strategy took
    pub redirect_count: usize,
    /// Strategy family
    pub method: ResolutionMethod,
}

/// The JSON record returned for every resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The submitted URL, as parsed
    pub original_url: String,
    /// Where resolution ended
    pub final_url: String,
    /// Status reported by the winning strategy
    pub status_code: u16,
    /// True iff `final_url` differs from `original_url`
    pub redirected: bool,
    /// Hops actually taken, never above the configured maximum
    pub redirect_count: usize,
    /// Strategy family that produced the result
    pub method: ResolutionMethod,
}

impl ResolutionResult {
    /// Builds a result, deriving `redirected` and capping the hop count at `max_hops`.
    pub fn new(original_url: impl Into<String>, resolution: Resolution, max_hops: usize) -> Self {
        let original_url = original_url.into();
        Self {
            redirected: resolution.final_url != original_url,
            original_url,
            final_url: resolution.final_url,
            status_code: resolution.status_code,
            redirect_count: resolution.redirect_count.min(max_hops),
            method: resolution.method,
        }
    }
}
