//! HEAD probe of the canonical article URL.
//!
//! For some articles news.google.com still answers a plain HEAD with a 3xx
//! pointing at the publisher. The probe asks once, without following.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::Url;

use crate::fetch::HeaderStrategy;

use super::hosts::is_google_host;

/// A non-Google redirect target announced by the article URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRedirect {
    /// Absolute destination from the `Location` header
    pub location: String,
    /// Status of the probe response (3xx)
    pub status: u16,
}

/// Issues a single HEAD request on a client with redirects disabled.
#[derive(Debug, Clone)]
pub struct HeadProbe {
    client: Arc<reqwest::Client>,
    headers: Arc<dyn HeaderStrategy>,
    timeout: Duration,
}

impl HeadProbe {
    /// `client` must not follow redirects, otherwise the `Location` is never seen.
    pub fn new(
        client: Arc<reqwest::Client>,
        headers: Arc<dyn HeaderStrategy>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            headers,
            timeout,
        }
    }

    /// Probes `article_url`, returning the redirect target if it leaves Google.
    ///
    /// Returns `Ok(None)` when the answer is not a redirect, has no usable
    /// `Location`, or points back at a Google host.
    pub async fn probe(&self, article_url: &str) -> Result<Option<ProbeRedirect>, reqwest::Error> {
        let Ok(url) = Url::parse(article_url) else {
            return Ok(None);
        };

        let request = self.client.head(url.clone()).timeout(self.timeout);
        let response = self.headers.apply(request, &url).send().await?;
        let status = response.status();
        if !status.is_redirection() {
            log::debug!("HEAD probe of {} returned {}, no redirect", url, status);
            return Ok(None);
        }

        let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(None);
        };

        let Ok(target) = url.join(location) else {
            log::debug!("HEAD probe of {} returned unparseable Location '{}'", url, location);
            return Ok(None);
        };

        if target.host_str().is_none_or(is_google_host) {
            log::debug!("HEAD probe of {} stays on Google ({})", url, target);
            return Ok(None);
        }

        Ok(Some(ProbeRedirect {
            location: target.to_string(),
            status: status.as_u16(),
        }))
    }
}
