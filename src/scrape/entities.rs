//! Candidate URL normalization.
//!
//! URLs recovered from HTML and inline scripts arrive HTML-escaped,
//! JS-escaped and sometimes percent-encoded. Normalization undoes all three
//! in that order.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Decodes the HTML entities that show up in attribute values.
///
/// `&amp;` is replaced last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub fn decode_html_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Decodes the JS escape sequences used for URL delimiters in inline scripts.
pub fn decode_js_escapes(input: &str) -> String {
    input
        .replace("\\u003d", "=")
        .replace("\\u003D", "=")
        .replace("\\u0026", "&")
        .replace("\\/", "/")
}

/// Percent-decodes `input`, leaving it untouched if the result is not UTF-8.
pub fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }
    match percent_decode_str(input).decode_utf8() {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => input.to_string(),
    }
}

/// Applies HTML entity decoding, JS unescaping and percent-decoding.
pub fn normalize_candidate(raw: &str) -> String {
    percent_decode(&decode_js_escapes(&decode_html_entities(raw.trim())))
}
