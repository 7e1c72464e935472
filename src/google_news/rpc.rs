//! Batch-RPC decoder for article ids carrying an opaque token.
//!
//! Newer article ids wrap an `AU_yqL...` token instead of the destination URL.
//! Google's own front end resolves those through the `Fbv4je` batch-RPC call;
//! this module issues the same call and digs the URL out of the nested
//! JSON-in-JSON response.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, REFERER};
use serde_json::Value;

use crate::config::{RPC_RESPONSE_PREAMBLE, RPC_RESULT_END_MARKER, RPC_RESULT_START_MARKER};
use crate::error_handling::RpcError;
use crate::scrape::decode_js_escapes;

const RPC_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";
const RPC_REFERER: &str = "https://news.google.com/";

/// Client for the Google News batch-RPC decode call.
#[derive(Debug, Clone)]
pub struct RpcDecoder {
    client: Arc<reqwest::Client>,
    endpoint: String,
    timeout: Duration,
}

impl RpcDecoder {
    /// Creates a decoder posting to `endpoint` with a per-call `timeout`.
    pub fn new(client: Arc<reqwest::Client>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// The endpoint this decoder posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolves `article_id` to its destination URL.
    ///
    /// # Errors
    ///
    /// - `RpcError::Request` on transport failure or timeout
    /// - `RpcError::Status` on a non-2xx answer
    /// - `RpcError::MarkerMissing` if the response carries no URL
    pub async fn decode(&self, article_id: &str) -> Result<String, RpcError> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("f.req", &build_request_payload(article_id))
            .finish();

        log::debug!("Decoding article id via batch-RPC at {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, RPC_CONTENT_TYPE)
            .header(REFERER, RPC_REFERER)
            .timeout(self.timeout)
            .body(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_rpc_response(&text)
    }
}

/// Builds the `f.req` JSON for the `Fbv4je` call.
///
/// The literal mirrors what the Google News web client sends; the endpoint
/// rejects requests that deviate from it.
pub fn build_request_payload(article_id: &str) -> String {
    format!(
        r#"[[["Fbv4je","[\"garturlreq\",[[\"en-US\",\"US\",[\"FINANCE_TOP_INDICES\",\"WEB_TEST_1_0_0\"],null,null,1,1,\"US:en\",null,180,null,null,null,null,null,0,null,null,[1608992183,723341000]],\"en-US\",\"US\",1,[2,3,4,8],1,0,\"655000234\",0,0,null,0],\"{}\"]",null,"generic"]]]"#,
        article_id
    )
}

/// Extracts the destination URL from a batch-RPC response body.
///
/// The structured parse walks `[[_, _, "<inner json>"], ...]` entries where the
/// inner JSON is `["garturlres", "<url>", ...]`. If that fails, the raw text
/// between the `garturlres` markers is used.
pub fn parse_rpc_response(text: &str) -> Result<String, RpcError> {
    let body = text.strip_prefix(RPC_RESPONSE_PREAMBLE).unwrap_or(text);

    if let Some(url) = structured_url(body) {
        return Ok(url);
    }

    log::debug!("Structured batch-RPC parse found no URL, scanning for markers");
    marker_url(body).ok_or(RpcError::MarkerMissing)
}

fn structured_url(body: &str) -> Option<String> {
    std::iter::once(body)
        .chain(body.lines())
        .filter_map(|chunk| serde_json::from_str::<Value>(chunk.trim()).ok())
        .find_map(|value| url_from_envelope(&value))
}

fn url_from_envelope(value: &Value) -> Option<String> {
    value.as_array()?.iter().find_map(|entry| {
        let inner = entry.as_array()?.get(2)?.as_str()?;
        let inner: Value = serde_json::from_str(inner).ok()?;
        let url = inner.as_array()?.get(1)?.as_str()?;
        url.starts_with("http").then(|| url.to_string())
    })
}

fn marker_url(body: &str) -> Option<String> {
    let start = body.find(RPC_RESULT_START_MARKER)? + RPC_RESULT_START_MARKER.len();
    let rest = &body[start..];
    let end = rest.find(RPC_RESULT_END_MARKER)?;
    let url = decode_js_escapes(&rest[..end]);
    if url.is_empty() {
        None
    } else {
        Some(url)
    }
}
