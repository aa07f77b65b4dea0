use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT,
};

use crate::config::DEFAULT_USER_AGENT;

/// Build browser-like default headers for documentation requests
///
/// `Accept-Encoding` is left to the client so compressed bodies are decoded.
/// An unusable `user_agent` (non-visible ASCII) falls back to
/// [`DEFAULT_USER_AGENT`].
///
/// # Examples
///
/// ```
/// use docharvest::crawler::headers::build_default_headers;
///
/// let headers = build_default_headers("docharvest/0.1");
/// assert_eq!(headers["user-agent"], "docharvest/0.1");
/// ```
pub fn build_default_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let agent = HeaderValue::from_str(user_agent).unwrap_or_else(|_| {
        tracing::warn!(user_agent = %user_agent, "Invalid user agent, using default");
        HeaderValue::from_static(DEFAULT_USER_AGENT)
    });
    headers.insert(USER_AGENT, agent);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    headers
}
