//! HTTP redirect chain resolution.
//!
//! This module follows redirect chains manually so that every hop is visible:
//! 3xx `Location` headers are resolved against the current URL, and 200 HTML
//! interstitials are handed to the scrape extractors to recover JS or
//! meta-refresh redirects that a plain HTTP client would stop at.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{StatusCode, Url};

use crate::error_handling::NetworkError;
use crate::fetch::request::HeaderStrategy;
use crate::scrape::ScrapeExtractor;

/// Outcome of following a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectChain {
    /// Where the chain ended
    pub current_url: String,
    /// Hops actually taken (3xx follows plus scrape extractions)
    pub hops_taken: usize,
    /// Status of the last response received
    pub last_status: u16,
    /// Every URL requested, in order
    pub visited: Vec<String>,
}

impl RedirectChain {
    fn start(url: &Url) -> Self {
        Self {
            current_url: url.to_string(),
            hops_taken: 0,
            last_status: 0,
            visited: Vec::new(),
        }
    }
}

/// Follows redirects hop by hop on a client with automatic redirects disabled.
#[derive(Debug, Clone)]
pub struct RedirectChaser {
    client: Arc<reqwest::Client>,
    headers: Arc<dyn HeaderStrategy>,
    scraper: Option<ScrapeExtractor>,
}

impl RedirectChaser {
    /// Creates a chaser. `client` must be built with `redirect::Policy::none()`.
    ///
    /// With `scraper` set, 200 HTML responses are searched for an embedded
    /// destination and a hit counts as a hop.
    pub fn new(
        client: Arc<reqwest::Client>,
        headers: Arc<dyn HeaderStrategy>,
        scraper: Option<ScrapeExtractor>,
    ) -> Self {
        Self {
            client,
            headers,
            scraper,
        }
    }

    /// Follows `start_url` for at most `max_hops` hops.
    ///
    /// The chain ends on a non-redirect response with nothing to scrape, on a
    /// redirect without `Location`, or once `max_hops` hops were taken. A
    /// failure after at least one hop ends the chain where it stands.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` only if the chain fails before the first hop.
    pub async fn chase(&self, start_url: &Url, max_hops: usize) -> Result<RedirectChain, NetworkError> {
        let mut chain = RedirectChain::start(start_url);
        let mut current = start_url.clone();

        loop {
            chain.visited.push(current.to_string());
            let request = self.headers.apply(self.client.get(current.clone()), &current);
            let response = match request.send().await {
                Ok(response) => response,
                Err(source) if chain.hops_taken == 0 => {
                    return Err(NetworkError::Request {
                        url: current.to_string(),
                        source,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Redirect chain for {} stopped at {} after {} hops: {}",
                        start_url,
                        current,
                        chain.hops_taken,
                        e
                    );
                    break;
                }
            };

            let status = response.status();
            chain.last_status = status.as_u16();

            let next = if status.is_redirection() {
                let Some(location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                else {
                    log::warn!("Redirect status {} for {} but no Location header", status, current);
                    break;
                };
                match current.join(&location) {
                    Ok(next) => next,
                    Err(source) if chain.hops_taken == 0 => {
                        return Err(NetworkError::InvalidLocation {
                            url: current.to_string(),
                            location,
                            source,
                        });
                    }
                    Err(e) => {
                        log::warn!("Invalid Location '{}' from {}: {}", location, current, e);
                        break;
                    }
                }
            } else if status == StatusCode::OK {
                match self.scrape(response, &current).await {
                    Some(next) => next,
                    None => break,
                }
            } else {
                break;
            };

            if chain.hops_taken >= max_hops {
                log::debug!(
                    "Redirect chain for {} reached the {} hop limit at {}",
                    start_url,
                    max_hops,
                    current
                );
                break;
            }

            log::debug!("Hop {}: {} -> {}", chain.hops_taken + 1, current, next);
            chain.hops_taken += 1;
            chain.current_url = next.to_string();
            current = next;
        }

        Ok(chain)
    }

    /// Looks for an embedded destination in a 200 HTML response.
    async fn scrape(&self, response: reqwest::Response, current: &Url) -> Option<Url> {
        let scraper = self.scraper.as_ref()?;

        // A missing Content-Type is treated as HTML; some servers don't send one
        if let Some(ct) = response.headers().get(CONTENT_TYPE) {
            let ct = ct.to_str().unwrap_or("").to_lowercase();
            if !ct.starts_with("text/html") {
                return None;
            }
        }

        let body = match response.text().await {
            Ok(text) if text.len() > crate::config::MAX_RESPONSE_BODY_SIZE => {
                log::debug!("Skipping scrape of large body from {}: {} bytes", current, text.len());
                return None;
            }
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read response body for {}: {}", current, e);
                return None;
            }
        };

        let found = scraper.extract(&body, current)?;
        Url::parse(&found).ok()
    }
}
