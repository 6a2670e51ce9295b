use std::collections::HashMap;

use axum::http::HeaderMap;
use url::form_urlencoded;

/// The read-only slice of an inbound request the filter chain consumes:
/// query parameters and headers. Built once per request before the first
/// filter runs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    query: HashMap<String, String>,
    headers: HeaderMap,
}

impl RequestContext {
    pub fn from_request<B>(request: &axum::http::Request<B>) -> Self {
        let query = request
            .uri()
            .query()
            .map(parse_query)
            .unwrap_or_default();
        Self { query, headers: request.headers().clone() }
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|value| value.to_str().ok())
    }

    /// Bearer token from the Authorization header, if present and non-empty.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
}
