//! Request descriptors and URL resolution

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Per-call options: header overrides and timeout
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    /// Overrides the client's default timeout
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Everything needed to (re)issue one logical request
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

/// Rewrite a logical API path onto the base URL.
///
/// A path starting with `prefix` becomes `base_url` followed by the path
/// minus its leading `/`; anything else is returned unchanged so static or
/// absolute URLs can be addressed with the same call.
pub fn resolve_url(base_url: &str, prefix: &str, path: &str) -> String {
    if path.starts_with(prefix) {
        let mut rest = path.chars();
        rest.next();
        format!("{base_url}{}", rest.as_str())
    } else {
        path.to_string()
    }
}
