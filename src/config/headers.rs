//! HTTP header name constants.
//!
//! Header names that `reqwest::header` does not provide a constant for.

/// Do-Not-Track header
pub const HEADER_DNT: &str = "dnt";
/// Fetch metadata: request destination
pub const HEADER_SEC_FETCH_DEST: &str = "sec-fetch-dest";
/// Fetch metadata: request mode
pub const HEADER_SEC_FETCH_MODE: &str = "sec-fetch-mode";
/// Fetch metadata: relationship between initiator and target
pub const HEADER_SEC_FETCH_SITE: &str = "sec-fetch-site";
/// Fetch metadata: whether the navigation was user-activated
pub const HEADER_SEC_FETCH_USER: &str = "sec-fetch-user";
/// Client address forwarded by proxies
pub const HEADER_X_FORWARDED_FOR: &str = "x-forwarded-for";

// CORS response headers
/// Allowed origins for cross-origin callers
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// Methods accepted by the resolver endpoints
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
/// Request headers accepted from cross-origin callers
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
