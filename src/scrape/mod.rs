//! Destination URL extraction from HTML and inline scripts.
//!
//! Interstitial pages (JS redirects, meta refreshes, Google News article
//! shells) answer with 200 instead of a 3xx. The [`ScrapeExtractor`] runs a
//! ranked list of [`Extractor`]s over such a body and returns the first
//! candidate that looks like a real destination.

mod entities;
mod extractors;

use std::sync::Arc;

use reqwest::Url;

use crate::config::BLOCKED_PATH_MARKERS;
use crate::google_news::is_google_host;

pub use entities::{decode_html_entities, decode_js_escapes, normalize_candidate, percent_decode};
pub use extractors::{DataHref, Extractor, ExtractorScope, JsonUrlField, MetaRefresh, WindowLocation};

/// Ranked extractor list plus the candidate acceptance rules.
#[derive(Debug, Clone)]
pub struct ScrapeExtractor {
    extractors: Vec<Arc<dyn Extractor>>,
    blocked_paths: Vec<String>,
}

impl ScrapeExtractor {
    /// Creates an extractor that tries `extractors` in order.
    pub fn new(extractors: Vec<Arc<dyn Extractor>>, blocked_paths: Vec<String>) -> Self {
        Self {
            extractors,
            blocked_paths,
        }
    }

    /// Names of the configured extractors, in rank order.
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Returns the first acceptable destination embedded in `body`.
    ///
    /// `current_url` is the page the body was served from. It decides which
    /// extractors run and is itself never accepted as a destination.
    pub fn extract(&self, body: &str, current_url: &Url) -> Option<String> {
        let on_google = current_url.host_str().is_some_and(is_google_host);

        for extractor in &self.extractors {
            if extractor.scope() == ExtractorScope::GoogleOnly && !on_google {
                continue;
            }
            for raw in extractor.candidates(body) {
                let candidate = normalize_candidate(&raw);
                if self.accepts(&candidate, current_url) {
                    log::debug!(
                        "Extractor {} found destination {} on {}",
                        extractor.name(),
                        candidate,
                        current_url
                    );
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn accepts(&self, candidate: &str, current_url: &Url) -> bool {
        if !candidate.starts_with("http") || candidate == current_url.as_str() {
            return false;
        }
        let Ok(parsed) = Url::parse(candidate) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") || parsed == *current_url {
            return false;
        }
        if parsed.host_str().is_none_or(is_google_host) {
            return false;
        }
        let path = parsed.path();
        !self
            .blocked_paths
            .iter()
            .any(|marker| path.contains(marker.as_str()))
    }
}

impl Default for ScrapeExtractor {
    fn default() -> Self {
        Self::new(
            default_extractors(),
            BLOCKED_PATH_MARKERS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

/// The built-in ranking: meta refresh, script location, data attributes, JSON fields.
pub fn default_extractors() -> Vec<Arc<dyn Extractor>> {
    vec![
        Arc::new(MetaRefresh),
        Arc::new(WindowLocation),
        Arc::new(DataHref),
        Arc::new(JsonUrlField),
    ]
}
