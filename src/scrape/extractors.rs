//! Individual destination-URL extractors.
//!
//! Each extractor recovers raw candidate strings from a response body. The
//! candidates are neither normalized nor validated here; that is the job of
//! [`ScrapeExtractor`](super::ScrapeExtractor).

use std::fmt::Debug;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

// CSS selector strings
const META_REFRESH_SELECTOR_STR: &str = "meta[http-equiv]";
const DATA_N_HREF_SELECTOR_STR: &str = "[data-n-href]";
const ANCHOR_HREF_SELECTOR_STR: &str = "a[href]";

static META_REFRESH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(META_REFRESH_SELECTOR_STR, "META_REFRESH_SELECTOR"));
static DATA_N_HREF_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(DATA_N_HREF_SELECTOR_STR, "DATA_N_HREF_SELECTOR"));
static ANCHOR_HREF_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(ANCHOR_HREF_SELECTOR_STR, "ANCHOR_HREF_SELECTOR"));

/// `window.location = "..."`, `location.href = '...'`, `document.location = ...`
static LOCATION_ASSIGNMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r#"(?:window\.|document\.|top\.|self\.)?location(?:\.href)?\s*=\s*["']([^"']+)["']"#,
        "LOCATION_ASSIGNMENT_PATTERN",
    )
});

/// `location.replace("...")` and `location.assign("...")`
static LOCATION_CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r#"location\.(?:replace|assign)\(\s*["']([^"']+)["']\s*\)"#,
        "LOCATION_CALL_PATTERN",
    )
});

static JSON_URL_FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r#""url"\s*:\s*"([^"]+)""#, "JSON_URL_FIELD_PATTERN")
});

fn compile_regex(pattern: &str, name: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern in {}: {}. This is a programming error.",
            name, e
        )
    })
}

fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

/// Pages an extractor may run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorScope {
    /// Any page reached while chasing redirects.
    AnyPage,
    /// Only pages served from a Google host. These patterns also match
    /// ordinary links, so running them elsewhere would hijack the chain.
    GoogleOnly,
}

/// A single pattern that recovers candidate URLs from a response body.
pub trait Extractor: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Pages this extractor applies to.
    fn scope(&self) -> ExtractorScope {
        ExtractorScope::AnyPage
    }

    /// Raw candidates in document order.
    fn candidates(&self, body: &str) -> Vec<String>;
}

/// `<meta http-equiv="refresh" content="0;url=...">`
#[derive(Debug, Default, Clone, Copy)]
pub struct MetaRefresh;

impl Extractor for MetaRefresh {
    fn name(&self) -> &'static str {
        "meta_refresh"
    }

    fn candidates(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);
        document
            .select(&META_REFRESH_SELECTOR)
            .filter(|element| {
                element
                    .value()
                    .attr("http-equiv")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
            })
            .filter_map(|element| element.value().attr("content"))
            .filter_map(refresh_target)
            .collect()
    }
}

/// Pulls the target out of a refresh `content` value such as `0; URL='...'`.
fn refresh_target(content: &str) -> Option<String> {
    let lower = content.to_ascii_lowercase();
    let start = lower.find("url")?;
    let rest = content[start + 3..].trim_start();
    let rest = rest.strip_prefix('=')?.trim();
    let target = rest.trim_matches(|c| c == '\'' || c == '"').trim();
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// `window.location`, `location.href` and `location.replace(...)` in inline scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowLocation;

impl Extractor for WindowLocation {
    fn name(&self) -> &'static str {
        "window_location"
    }

    fn candidates(&self, body: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = LOCATION_ASSIGNMENT_PATTERN
            .captures_iter(body)
            .chain(LOCATION_CALL_PATTERN.captures_iter(body))
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.start(), m.as_str().to_string()))
            .collect();
        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, url)| url).collect()
    }
}

/// `data-n-href` attributes, then anchor `href`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataHref;

impl Extractor for DataHref {
    fn name(&self) -> &'static str {
        "data_href"
    }

    fn scope(&self) -> ExtractorScope {
        ExtractorScope::GoogleOnly
    }

    fn candidates(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);
        let data_hrefs = document
            .select(&DATA_N_HREF_SELECTOR)
            .filter_map(|element| element.value().attr("data-n-href"));
        let anchors = document
            .select(&ANCHOR_HREF_SELECTOR)
            .filter_map(|element| element.value().attr("href"));
        data_hrefs.chain(anchors).map(str::to_string).collect()
    }
}

/// `"url": "..."` fields in embedded JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonUrlField;

impl Extractor for JsonUrlField {
    fn name(&self) -> &'static str {
        "json_url"
    }

    fn scope(&self) -> ExtractorScope {
        ExtractorScope::GoogleOnly
    }

    fn candidates(&self, body: &str) -> Vec<String> {
        JSON_URL_FIELD_PATTERN
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
