//! Outbound request shaping.
//!
//! Every GET the resolver issues goes through a [`HeaderStrategy`]. The browser
//! strategy mimics a modern desktop browser to reduce header-based bot
//! detection; the fixed strategy sends a single pinned User-Agent.

use std::net::Ipv4Addr;

use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;

use crate::config::{
    BROWSER_ACCEPT, BROWSER_ACCEPT_ENCODING, BROWSER_ACCEPT_LANGUAGE, DEFAULT_USER_AGENTS,
    HEADER_DNT, HEADER_SEC_FETCH_DEST, HEADER_SEC_FETCH_MODE, HEADER_SEC_FETCH_SITE,
    HEADER_SEC_FETCH_USER, HEADER_X_FORWARDED_FOR,
};

/// Produces the request headers for an outbound request.
///
/// Implementations are immutable and shared across concurrent resolutions.
pub trait HeaderStrategy: Send + Sync + std::fmt::Debug {
    /// Builds the headers for a request to `url`.
    fn headers(&self, url: &Url) -> HeaderMap;

    /// Applies the headers to a `reqwest::RequestBuilder`.
    fn apply(&self, builder: reqwest::RequestBuilder, url: &Url) -> reqwest::RequestBuilder {
        builder.headers(self.headers(url))
    }
}

/// Realistic browser request headers with a rotating User-Agent.
///
/// Sends `Accept`, `Accept-Language`, `Accept-Encoding`, `DNT`,
/// `Upgrade-Insecure-Requests`, the `Sec-Fetch-*` family, `Cache-Control` and a
/// `Referer` pointing at the target's own origin. When enabled, roughly half of
/// the requests also carry a random `X-Forwarded-For`.
///
/// JA3 TLS fingerprinting will still identify rustls; these headers only help
/// against header analysis.
#[derive(Debug, Clone)]
pub struct BrowserHeaders {
    user_agents: Vec<String>,
    spoof_forwarded_for: bool,
}

impl BrowserHeaders {
    /// Creates a strategy rotating through `user_agents`.
    ///
    /// An empty pool falls back to the built-in default pool.
    pub fn new(user_agents: Vec<String>) -> Self {
        let user_agents = if user_agents.is_empty() {
            default_user_agents()
        } else {
            user_agents
        };
        Self {
            user_agents,
            spoof_forwarded_for: false,
        }
    }

    /// Enables or disables the random `X-Forwarded-For` header.
    pub fn with_forwarded_for(mut self, enabled: bool) -> Self {
        self.spoof_forwarded_for = enabled;
        self
    }

    /// The User-Agent pool this strategy rotates through.
    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }

    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENTS[0])
    }
}

impl Default for BrowserHeaders {
    fn default() -> Self {
        Self::new(default_user_agents())
    }
}

impl HeaderStrategy for BrowserHeaders {
    fn headers(&self, url: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, reqwest::header::USER_AGENT, self.pick_user_agent());
        insert(&mut headers, reqwest::header::ACCEPT, BROWSER_ACCEPT);
        insert(
            &mut headers,
            reqwest::header::ACCEPT_LANGUAGE,
            BROWSER_ACCEPT_LANGUAGE,
        );
        insert(
            &mut headers,
            reqwest::header::ACCEPT_ENCODING,
            BROWSER_ACCEPT_ENCODING,
        );
        insert(&mut headers, HeaderName::from_static(HEADER_DNT), "1");
        insert(&mut headers, reqwest::header::UPGRADE_INSECURE_REQUESTS, "1");
        insert(
            &mut headers,
            HeaderName::from_static(HEADER_SEC_FETCH_DEST),
            "document",
        );
        insert(
            &mut headers,
            HeaderName::from_static(HEADER_SEC_FETCH_MODE),
            "navigate",
        );
        insert(
            &mut headers,
            HeaderName::from_static(HEADER_SEC_FETCH_SITE),
            "none",
        );
        insert(
            &mut headers,
            HeaderName::from_static(HEADER_SEC_FETCH_USER),
            "?1",
        );
        insert(&mut headers, reqwest::header::CACHE_CONTROL, "max-age=0");
        if let Some(host) = url.host_str() {
            insert(
                &mut headers,
                reqwest::header::REFERER,
                &format!("https://{host}/"),
            );
        }

        if self.spoof_forwarded_for {
            let mut rng = rand::rng();
            if rng.random_bool(0.5) {
                let addr = Ipv4Addr::new(rng.random(), rng.random(), rng.random(), rng.random());
                insert(
                    &mut headers,
                    HeaderName::from_static(HEADER_X_FORWARDED_FOR),
                    &addr.to_string(),
                );
            }
        }

        headers
    }
}

/// A single pinned User-Agent with a generic `Accept` header.
#[derive(Debug, Clone)]
pub struct FixedHeaders {
    user_agent: String,
}

impl FixedHeaders {
    /// Creates a strategy that always sends `user_agent`.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl HeaderStrategy for FixedHeaders {
    fn headers(&self, _url: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, reqwest::header::USER_AGENT, &self.user_agent);
        insert(&mut headers, reqwest::header::ACCEPT, BROWSER_ACCEPT);
        headers
    }
}

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
}

/// Inserts a header, skipping values that are not valid header text.
fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => {
            log::debug!("Skipping invalid value for header {}: {}", name, e);
        }
    }
}
