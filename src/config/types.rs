//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_LISTEN_ADDR, DEFAULT_RPC_ENDPOINT, FETCH_TIMEOUT_SECS, MAX_REDIRECT_HOPS,
    PROBE_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Resolver configuration.
///
/// Parsed from the command line by the binary, but it can equally be
/// constructed programmatically.
///
/// # Examples
///
/// ```no_run
/// use link_resolver::Config;
///
/// let config = Config {
///     max_hops: 5,
///     scrape: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "link_resolver",
    version,
    about = "Resolves redirect chains and Google News article links to their final URL"
)]
pub struct Config {
    /// URLs to resolve once and print as JSON lines (serves HTTP when empty)
    pub urls: Vec<String>,

    /// Address the HTTP server listens on
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Maximum redirect hops (network redirects plus scraped hops)
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_hops: usize,

    /// Per-request timeout in seconds for content fetches and redirect hops
    #[arg(long, default_value_t = FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Timeout in seconds for batch-RPC decodes and HEAD probes
    #[arg(long, default_value_t = PROBE_TIMEOUT_SECS)]
    pub rpc_timeout_seconds: u64,

    /// Batch-RPC endpoint used for article ids the binary decoder cannot handle
    #[arg(long, default_value = DEFAULT_RPC_ENDPOINT)]
    pub rpc_endpoint: String,

    /// Feed 200 responses to the HTML scrape extractors
    #[arg(long = "no-scrape", action = clap::ArgAction::SetFalse)]
    pub scrape: bool,

    /// Probe unresolved article links with a HEAD request
    #[arg(long = "no-head-probe", action = clap::ArgAction::SetFalse)]
    pub head_probe: bool,

    /// Add a random X-Forwarded-For header to roughly half of the requests
    #[arg(long)]
    pub spoof_forwarded_for: bool,

    /// Pin a single User-Agent instead of rotating the built-in pool
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            max_hops: MAX_REDIRECT_HOPS,
            timeout_seconds: FETCH_TIMEOUT_SECS,
            rpc_timeout_seconds: PROBE_TIMEOUT_SECS,
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            scrape: true,
            head_probe: true,
            spoof_forwarded_for: false,
            user_agent: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
