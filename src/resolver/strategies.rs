//! Resolution strategies.
//!
//! Each strategy is an independent [`UrlResolver`]. The orchestrator runs the
//! article strategies in order for Google News links and the redirect chase
//! for everything else.

use async_trait::async_trait;
use reqwest::Url;

use crate::error_handling::{DecodeError, NetworkError};
use crate::fetch::RedirectChaser;
use crate::google_news::{decode_article_id, GoogleNewsArticle, HeadProbe, RpcDecoder};

use super::types::{Resolution, ResolutionMethod};

/// Per-resolution input shared by all strategies.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// The validated input URL
    pub url: Url,
    /// Set when the input is a Google News article link
    pub article: Option<GoogleNewsArticle>,
    /// Set once the binary decoder found an opaque token
    pub needs_rpc_decode: bool,
    /// Hop budget for strategies that follow redirects
    pub max_hops: usize,
}

impl ResolveContext {
    /// Classifies `url` and starts with the RPC flag cleared.
    pub fn new(url: Url, max_hops: usize) -> Self {
        let article = GoogleNewsArticle::from_url(&url);
        Self {
            url,
            article,
            needs_rpc_decode: false,
            max_hops,
        }
    }
}

/// What a strategy made of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A destination was found
    Resolved(Resolution),
    /// The article id carries an opaque token; only the batch-RPC decoder can help
    NeedsRpcDecode,
    /// Nothing found, try the next strategy
    Unresolved,
}

/// A single way of turning an opaque URL into its destination.
#[async_trait]
pub trait UrlResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempts to resolve `ctx.url`.
    ///
    /// Recoverable failures are reported as `Outcome::Unresolved`; only a
    /// redirect chase that made no progress returns an error.
    async fn resolve(&self, ctx: &ResolveContext) -> Result<Outcome, NetworkError>;
}

fn decoded(final_url: String) -> Outcome {
    Outcome::Resolved(Resolution {
        final_url,
        status_code: 200,
        redirect_count: 1,
        method: ResolutionMethod::GoogleNewsDecode,
    })
}

/// Offline decode of the article id.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryDecodeStrategy;

#[async_trait]
impl UrlResolver for BinaryDecodeStrategy {
    fn name(&self) -> &'static str {
        "binary_decode"
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Outcome, NetworkError> {
        let Some(article) = &ctx.article else {
            return Ok(Outcome::Unresolved);
        };

        match decode_article_id(article.id()) {
            Ok(url) => Ok(decoded(url)),
            Err(DecodeError::NeedsRpcDecode) => {
                log::debug!("Article {} carries an opaque token", article.id());
                Ok(Outcome::NeedsRpcDecode)
            }
            Err(e) => {
                log::debug!("Binary decode of {} failed: {}", article.id(), e);
                Ok(Outcome::Unresolved)
            }
        }
    }
}

/// Batch-RPC decode, only for ids flagged by the binary decoder.
#[derive(Debug, Clone)]
pub struct RpcDecodeStrategy {
    decoder: RpcDecoder,
}

impl RpcDecodeStrategy {
    /// Wraps a batch-RPC decoder.
    pub fn new(decoder: RpcDecoder) -> Self {
        Self { decoder }
    }
}

#[async_trait]
impl UrlResolver for RpcDecodeStrategy {
    fn name(&self) -> &'static str {
        "rpc_decode"
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Outcome, NetworkError> {
        let Some(article) = &ctx.article else {
            return Ok(Outcome::Unresolved);
        };
        if !ctx.needs_rpc_decode {
            return Ok(Outcome::Unresolved);
        }

        match self.decoder.decode(article.id()).await {
            Ok(url) => Ok(decoded(url)),
            Err(e) => {
                log::warn!("Batch-RPC decode of {} failed: {}", article.id(), e);
                Ok(Outcome::Unresolved)
            }
        }
    }
}

/// HEAD probe of the canonical article URL.
#[derive(Debug, Clone)]
pub struct HeadProbeStrategy {
    probe: HeadProbe,
}

impl HeadProbeStrategy {
    /// Wraps a HEAD probe.
    pub fn new(probe: HeadProbe) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl UrlResolver for HeadProbeStrategy {
    fn name(&self) -> &'static str {
        "head_probe"
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Outcome, NetworkError> {
        let Some(article) = &ctx.article else {
            return Ok(Outcome::Unresolved);
        };

        match self.probe.probe(&article.canonical_url()).await {
            Ok(Some(redirect)) => Ok(Outcome::Resolved(Resolution {
                final_url: redirect.location,
                status_code: redirect.status,
                redirect_count: 1,
                method: ResolutionMethod::GoogleNewsDecode,
            })),
            Ok(None) => Ok(Outcome::Unresolved),
            Err(e) => {
                log::debug!("HEAD probe of {} failed: {}", article.canonical_url(), e);
                Ok(Outcome::Unresolved)
            }
        }
    }
}

/// Manual redirect chase with scrape-assisted hops.
#[derive(Debug, Clone)]
pub struct RedirectChaseStrategy {
    chaser: RedirectChaser,
}

impl RedirectChaseStrategy {
    /// Wraps a redirect chaser.
    pub fn new(chaser: RedirectChaser) -> Self {
        Self { chaser }
    }
}

#[async_trait]
impl UrlResolver for RedirectChaseStrategy {
    fn name(&self) -> &'static str {
        "redirect_chase"
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Outcome, NetworkError> {
        let chain = self.chaser.chase(&ctx.url, ctx.max_hops).await?;
        log::debug!(
            "Redirect chain for {}: {} hops via {:?}",
            ctx.url,
            chain.hops_taken,
            chain.visited
        );
        Ok(Outcome::Resolved(Resolution {
            final_url: chain.current_url,
            status_code: chain.last_status,
            redirect_count: chain.hops_taken,
            method: ResolutionMethod::StandardRedirect,
        }))
    }
}
