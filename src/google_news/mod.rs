//! Google News article link handling.
//!
//! This module provides:
//! - Article link classification and canonicalization
//! - The offline binary article-id decoder
//! - The batch-RPC decoder for opaque tokens
//! - The HEAD probe of the canonical article URL

mod article;
mod frame;
mod hosts;
mod probe;
mod rpc;

pub use article::GoogleNewsArticle;
pub use frame::{decode_article_id, decode_base64_id};
pub use hosts::{is_google_host, is_youtube_host};
pub use probe::{HeadProbe, ProbeRedirect};
pub use rpc::{build_request_payload, parse_rpc_response, RpcDecoder};
