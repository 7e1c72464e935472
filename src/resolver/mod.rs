//! Resolution orchestrator.
//!
//! Google News article links go through the article strategies in order
//! (binary decode, batch-RPC decode, HEAD probe) and fall back to the canonical
//! article URL. Every other URL goes straight to the redirect chase.

mod strategies;
mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::app::validate_url;
use crate::config::Config;
use crate::error_handling::{InitializationError, ResolveError};
use crate::fetch::RedirectChaser;
use crate::google_news::{HeadProbe, RpcDecoder};
use crate::initialization::{init_header_strategy, init_redirect_client};
use crate::scrape::ScrapeExtractor;

pub use strategies::{
    BinaryDecodeStrategy, HeadProbeStrategy, Outcome, RedirectChaseStrategy, ResolveContext,
    RpcDecodeStrategy, UrlResolver,
};
pub use types::{Resolution, ResolutionMethod, ResolutionResult};

/// Composes the strategies into the full resolution policy.
///
/// Immutable once built; share it behind an `Arc` across concurrent requests.
#[derive(Debug, Clone)]
pub struct Resolver {
    article_strategies: Vec<Arc<dyn UrlResolver>>,
    generic: Arc<dyn UrlResolver>,
    max_hops: usize,
}

impl Resolver {
    /// Builds the production strategy stack from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_redirect_client(config)?;
        let headers = init_header_strategy(config);
        let probe_timeout = Duration::from_secs(config.rpc_timeout_seconds);

        let mut article_strategies: Vec<Arc<dyn UrlResolver>> = vec![
            Arc::new(BinaryDecodeStrategy),
            Arc::new(RpcDecodeStrategy::new(RpcDecoder::new(
                Arc::clone(&client),
                config.rpc_endpoint.clone(),
                probe_timeout,
            ))),
        ];
        if config.head_probe {
            article_strategies.push(Arc::new(HeadProbeStrategy::new(HeadProbe::new(
                Arc::clone(&client),
                Arc::clone(&headers),
                probe_timeout,
            ))));
        }

        let scraper = config.scrape.then(ScrapeExtractor::default);
        let generic = Arc::new(RedirectChaseStrategy::new(RedirectChaser::new(
            client, headers, scraper,
        )));

        Ok(Self::from_parts(article_strategies, generic, config.max_hops))
    }

    /// Builds a resolver from explicit strategies.
    pub fn from_parts(
        article_strategies: Vec<Arc<dyn UrlResolver>>,
        generic: Arc<dyn UrlResolver>,
        max_hops: usize,
    ) -> Self {
        Self {
            article_strategies,
            generic,
            max_hops,
        }
    }

    /// Resolves `url` to its final destination.
    ///
    /// # Errors
    ///
    /// - `ResolveError::Input` if the URL is missing, malformed or not http(s)
    /// - `ResolveError::Network` if a redirect chase failed on its first hop
    ///
    /// Each outbound request carries its own timeout; a hop that times out
    /// after progress was made ends the chain where it stands.
    pub async fn resolve(&self, url: &str) -> Result<ResolutionResult, ResolveError> {
        let url = validate_url(url)?;
        self.resolve_validated(url).await
    }

    async fn resolve_validated(&self, url: Url) -> Result<ResolutionResult, ResolveError> {
        let original = url.to_string();
        let mut ctx = ResolveContext::new(url, self.max_hops);

        let resolution = match ctx.article.clone() {
            Some(article) => {
                log::debug!("Resolving Google News article {}", article.id());
                match self.run_article_strategies(&mut ctx).await {
                    Some(resolution) => resolution,
                    None => {
                        log::info!(
                            "No strategy resolved article {}, returning canonical URL",
                            article.id()
                        );
                        Resolution {
                            final_url: article.canonical_url(),
                            status_code: 200,
                            redirect_count: 0,
                            method: ResolutionMethod::Passthrough,
                        }
                    }
                }
            }
            None => match self.generic.resolve(&ctx).await? {
                Outcome::Resolved(resolution) => resolution,
                Outcome::NeedsRpcDecode | Outcome::Unresolved => Resolution {
                    final_url: original.clone(),
                    status_code: 200,
                    redirect_count: 0,
                    method: ResolutionMethod::Passthrough,
                },
            },
        };

        Ok(ResolutionResult::new(original, resolution, self.max_hops))
    }

    /// Runs the article strategies until one yields a URL other than the input.
    async fn run_article_strategies(&self, ctx: &mut ResolveContext) -> Option<Resolution> {
        for strategy in &self.article_strategies {
            match strategy.resolve(ctx).await {
                Ok(Outcome::Resolved(resolution)) if resolution.final_url != ctx.url.as_str() => {
                    log::debug!(
                        "Strategy {} resolved {} to {}",
                        strategy.name(),
                        ctx.url,
                        resolution.final_url
                    );
                    return Some(resolution);
                }
                Ok(Outcome::Resolved(_)) => {
                    log::debug!("Strategy {} returned the input unchanged", strategy.name());
                }
                Ok(Outcome::NeedsRpcDecode) => ctx.needs_rpc_decode = true,
                Ok(Outcome::Unresolved) => {}
                Err(e) => {
                    log::warn!("Strategy {} failed for {}: {}", strategy.name(), ctx.url, e);
                }
            }
        }
        None
    }
}
