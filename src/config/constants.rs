//! Configuration constants.
//!
//! This module defines the constants used throughout the resolver, including
//! timeouts, hop limits, the batch-RPC protocol literals and the request
//! shaping defaults.

/// Default listen address for the HTTP server
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

// Network operation timeouts
/// Timeout for content fetches and redirect hops in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 15;
/// Timeout for batch-RPC decodes and HEAD probes in seconds
pub const PROBE_TIMEOUT_SECS: u64 = 10;

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

// Response and body size limits
/// Maximum response body size in bytes (2MB) fed to the scrape extractors
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum URL length (2048 characters) accepted at the boundary.
/// This matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

// Google News
/// Host serving Google News article links
pub const GOOGLE_NEWS_HOST: &str = "news.google.com";
/// Prefix of the opaque token carried by newer article ids
pub const RPC_TOKEN_PREFIX: &str = "AU_yqL";
/// Batch-RPC endpoint used to decode newer article ids
pub const DEFAULT_RPC_ENDPOINT: &str =
    "https://news.google.com/_/DotsSplashUi/data/batchexecute?rpcids=Fbv4je";
/// Security preamble prepended to batch-RPC responses
pub const RPC_RESPONSE_PREAMBLE: &str = ")]}'\n\n";
/// Literal marker preceding the decoded URL in the raw RPC response
pub const RPC_RESULT_START_MARKER: &str = r#"[\"garturlres\",\""#;
/// Literal marker following the decoded URL in the raw RPC response
pub const RPC_RESULT_END_MARKER: &str = r#"\","#;

/// Interstitial paths that never are a destination (captcha, consent, login)
pub const BLOCKED_PATH_MARKERS: &[&str] = &["/sorry/", "/consent", "/unsupported", "/accounts/"];

// Request shaping
/// Accept header sent with browser-like requests
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
/// Accept-Language header sent with browser-like requests
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
/// Accept-Encoding header sent with browser-like requests
pub const BROWSER_ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Default User-Agent pool rotated by the browser header strategy.
///
/// Users can pin a single value via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

// Retry strategy (raw content fetch only)
/// Maximum number of fetch attempts (including initial attempt)
pub const RETRY_MAX_ATTEMPTS: usize = 3;
/// Base of the exponential backoff: delays are `base^n * RETRY_FACTOR_MS` (2s, 4s)
pub const RETRY_BACKOFF_BASE: u64 = 2;
/// Multiplier applied to each backoff step, in milliseconds
pub const RETRY_FACTOR_MS: u64 = 1000;

// HTTP status codes (for clarity and consistency)
/// 403 Forbidden, typically an anti-bot wall
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;
/// 404 Not Found, passed through by the fetch endpoint
pub const HTTP_STATUS_NOT_FOUND: u16 = 404;
/// 503 Service Unavailable
pub const HTTP_STATUS_SERVICE_UNAVAILABLE: u16 = 503;
