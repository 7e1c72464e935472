// Shared test helpers for building resolvers and Google News article links.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use link_resolver::{Config, LogFormat, LogLevel};

/// Creates a config suitable for tests: quiet logs, short timeouts, pinned UA.
///
/// The batch-RPC endpoint defaults to an unroutable address so a test that
/// does not expect RPC traffic fails fast instead of reaching Google.
#[allow(dead_code)] // Used by other test files
pub fn test_config() -> Config {
    Config {
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        timeout_seconds: 5,
        rpc_timeout_seconds: 5,
        rpc_endpoint: "http://127.0.0.1:9/batchexecute".to_string(),
        user_agent: Some("link_resolver_test/1.0".to_string()),
        head_probe: false,
        ..Default::default()
    }
}

/// Builds a Google News RSS article link whose id frames `payload`.
#[allow(dead_code)] // Used by other test files
pub fn article_url(payload: &[u8]) -> String {
    let mut frame = vec![0x08, 0x13, 0x22, payload.len() as u8];
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&[0xD2, 0x01, 0x00]);
    format!(
        "https://news.google.com/rss/articles/{}?oc=5",
        URL_SAFE_NO_PAD.encode(frame)
    )
}

/// Extracts the article id from a link built by [`article_url`].
#[allow(dead_code)] // Used by other test files
pub fn article_id(article_url: &str) -> String {
    let path = article_url
        .split("/articles/")
        .nth(1)
        .expect("article URL should contain /articles/");
    path.split('?').next().unwrap_or(path).to_string()
}
