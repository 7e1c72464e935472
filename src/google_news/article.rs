//! Google News article link classification.

use reqwest::Url;

use crate::config::GOOGLE_NEWS_HOST;

/// An article reference extracted from a Google News link.
///
/// Recognized shapes are `/articles/<id>`, `/rss/articles/<id>` and the
/// longer `/__i/rss/rd/articles/<id>`: the segment following `articles` is
/// the id. Query strings such as `?oc=5` are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleNewsArticle {
    id: String,
}

impl GoogleNewsArticle {
    /// Classifies `url`, returning the article reference if it is a Google
    /// News article link.
    ///
    /// The id must look like base64 (standard or URL-safe alphabet); anything
    /// else is treated as an ordinary URL.
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        if !host.eq_ignore_ascii_case(GOOGLE_NEWS_HOST) {
            return None;
        }

        let mut segments = url.path_segments()?;
        segments.find(|segment| *segment == "articles")?;
        let id = segments.next().filter(|id| !id.is_empty())?;

        if !id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'+' | b'/' | b'='))
        {
            log::debug!("Ignoring article segment with non-base64 characters: {id}");
            return None;
        }

        Some(Self { id: id.to_string() })
    }

    /// The opaque article id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The canonical article URL (`https://news.google.com/articles/<id>`).
    pub fn canonical_url(&self) -> String {
        format!("https://{}/articles/{}", GOOGLE_NEWS_HOST, self.id)
    }
}
