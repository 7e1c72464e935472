//! Binary article-id decoder.
//!
//! Google News article ids are base64 encodings of a small protobuf-like
//! frame: an optional constant header, a length-prefixed payload and an
//! optional constant trailer. Older ids carry the destination URL as a literal
//! payload; newer ids carry an opaque `AU_yqL...` token that only the batch-RPC
//! endpoint can resolve.
//!
//! The decoder performs no I/O and is a pure function of its input.

use std::sync::LazyLock;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::bytes::Regex;
use reqwest::Url;

use crate::config::RPC_TOKEN_PREFIX;
use crate::error_handling::DecodeError;

use super::hosts::{is_google_host, is_youtube_host};

/// Known frame headers, longest first.
const FRAME_HEADERS: &[&[u8]] = &[&[0x08, 0x13, 0x22], &[0x13, 0x22], &[0x22]];

/// Known frame trailers, longest first.
const FRAME_TRAILERS: &[&[u8]] = &[&[0xD2, 0x01, 0x00], &[0xD2, 0x01]];

/// URL-safe alphabet, padding optional, lenient about trailing bits.
const ARTICLE_ID_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Printable-ASCII run starting with a scheme; stops at control bytes,
/// spaces and non-ASCII bytes.
static EMBEDDED_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[\x21-\x7E]+").unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern in EMBEDDED_URL_PATTERN: {}. This is a programming error.",
            e
        )
    })
});

/// Decodes an article id into the destination URL it embeds.
///
/// # Errors
///
/// - `DecodeError::InvalidBase64` if the id is not base64
/// - `DecodeError::EmptyFrame` if nothing remains after stripping the framing
/// - `DecodeError::NeedsRpcDecode` if the payload is an opaque `AU_yqL` token;
///   the caller should pass the original id to the batch-RPC decoder
/// - `DecodeError::NoUrl` if no URL can be found anywhere in the frame
pub fn decode_article_id(article_id: &str) -> Result<String, DecodeError> {
    let bytes = decode_base64_id(article_id)?;
    let frame = strip_trailer(strip_header(&bytes));
    if frame.is_empty() {
        return Err(DecodeError::EmptyFrame);
    }

    let payload = read_payload(frame);
    if payload.starts_with(b"http") {
        return Ok(String::from_utf8_lossy(payload).into_owned());
    }
    if payload.starts_with(RPC_TOKEN_PREFIX.as_bytes()) {
        return Err(DecodeError::NeedsRpcDecode);
    }

    scan_for_url(&bytes).ok_or(DecodeError::NoUrl)
}

/// Base64-decodes an article id, accepting both alphabets and missing padding.
pub fn decode_base64_id(article_id: &str) -> Result<Vec<u8>, DecodeError> {
    let normalized: String = article_id
        .trim()
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    ARTICLE_ID_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}

fn strip_header(bytes: &[u8]) -> &[u8] {
    FRAME_HEADERS
        .iter()
        .find_map(|header| bytes.strip_prefix(*header))
        .unwrap_or(bytes)
}

fn strip_trailer(bytes: &[u8]) -> &[u8] {
    FRAME_TRAILERS
        .iter()
        .find_map(|trailer| bytes.strip_suffix(*trailer))
        .unwrap_or(bytes)
}

/// Reads the length-prefixed payload from a frame with the header stripped.
///
/// A prefix byte below 0x80 is the length itself. Otherwise the first two
/// bytes are read as a two-byte varint and the payload starts at offset 2.
/// A declared length that overruns the buffer is clamped to the remainder.
fn read_payload(frame: &[u8]) -> &[u8] {
    let Some(&first) = frame.first() else {
        return frame;
    };

    let (declared, offset) = if first < 0x80 {
        (first as usize, 1)
    } else {
        let second = frame.get(1).copied().unwrap_or(0) as usize;
        (((first & 0x7F) as usize) | (second << 7), 2)
    };

    let rest = frame.get(offset..).unwrap_or(&[]);
    if declared <= rest.len() {
        &rest[..declared]
    } else {
        log::debug!(
            "Declared payload length {} overruns frame ({} bytes), clamping",
            declared,
            rest.len()
        );
        rest
    }
}

/// Scans a decoded buffer for embedded URLs, preferring non-Google hosts.
fn scan_for_url(bytes: &[u8]) -> Option<String> {
    let candidates: Vec<String> = EMBEDDED_URL_PATTERN
        .find_iter(bytes)
        .filter_map(|m| std::str::from_utf8(m.as_bytes()).ok())
        .filter(|candidate| {
            Url::parse(candidate)
                .map(|u| u.host_str().is_some())
                .unwrap_or(false)
        })
        .map(str::to_string)
        .collect();

    candidates
        .iter()
        .find(|candidate| {
            Url::parse(candidate)
                .ok()
                .and_then(|u| u.host_str().map(|h| !is_google_host(h) && !is_youtube_host(h)))
                .unwrap_or(false)
        })
        .or_else(|| candidates.first())
        .cloned()
}
