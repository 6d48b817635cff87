//! Storefront API client
//!
//! Every call goes through one request chain:
//!
//! 1. send the request (with the stored access token, if any)
//! 2. classify the response
//! 3. if the credentials were rejected, refresh once and send again
//!
//! The second send never refreshes, so a chain has at most one retry. Callers
//! only ever see the final [`ResponseEnvelope`]; nothing is returned as `Err`.

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod expiry;
mod refresh;
pub mod request;

pub use config::ClientConfig;
pub use envelope::ResponseEnvelope;
pub use expiry::ExpirySignal;
pub use request::{RequestOptions, resolve_url};

use error::ClientError;
use refresh::RefreshOutcome;
use request::ApiRequest;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{MemoryTokenStore, TokenKind, TokenStore};
use tracing::{debug, warn};

/// Storefront API client
#[derive(Clone)]
pub struct StorefrontClient {
    client: Client,
    config: Arc<ClientConfig>,
    store: Arc<dyn TokenStore>,
    expiry: ExpirySignal,
}

/// Position of an attempt within its request chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    AfterRefresh,
}

/// Classified result of a single attempt
enum Outcome<T> {
    Settled(ResponseEnvelope<T>),
    /// Credentials rejected with this status
    Rejected(StatusCode),
}

impl StorefrontClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> StorefrontClientBuilder {
        StorefrontClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Signal fired when a session cannot be recovered
    pub const fn expiry_signal(&self) -> &ExpirySignal {
        &self.expiry
    }

    /// Resolve a logical path against the configured base URL
    pub fn resolve_url(&self, path: &str) -> String {
        resolve_url(&self.config.base_url, &self.config.api_prefix, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> ResponseEnvelope<T> {
        self.request(Method::GET, url, None, options).await
    }

    pub async fn post<T, B>(&self, url: &str, body: &B, options: RequestOptions) -> ResponseEnvelope<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match serde_json::to_value(body) {
            Ok(body) => self.request(Method::POST, url, Some(body), options).await,
            Err(e) => ResponseEnvelope::transport(&ClientError::Serialization(e)),
        }
    }

    pub async fn put<T, B>(&self, url: &str, body: &B, options: RequestOptions) -> ResponseEnvelope<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match serde_json::to_value(body) {
            Ok(body) => self.request(Method::PUT, url, Some(body), options).await,
            Err(e) => ResponseEnvelope::transport(&ClientError::Serialization(e)),
        }
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> ResponseEnvelope<T> {
        self.request(Method::DELETE, url, None, options).await
    }

    /// Run one request chain. A `null` body is not sent.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ResponseEnvelope<T> {
        let request = ApiRequest {
            method,
            url: self.resolve_url(url),
            body: body.filter(|b| !b.is_null()),
            options,
        };

        let status = match self.attempt(&request, Attempt::Initial).await {
            Outcome::Settled(envelope) => return envelope,
            Outcome::Rejected(status) => status,
        };

        debug!(
            url = %request.url,
            status = status.as_u16(),
            "Credentials rejected, attempting token refresh"
        );
        let timeout = request
            .options
            .timeout
            .unwrap_or_else(|| self.config.timeout());
        match self.refresh(timeout).await {
            RefreshOutcome::Refreshed => {}
            RefreshOutcome::Expired => return self.expire(status).await,
            RefreshOutcome::Transport(error) => return ResponseEnvelope::transport(&error),
        }

        match self.attempt(&request, Attempt::AfterRefresh).await {
            Outcome::Settled(envelope) => envelope,
            Outcome::Rejected(status) => self.expire(status).await,
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, request: &ApiRequest, attempt: Attempt) -> Outcome<T> {
        debug!(method = %request.method, url = %request.url, ?attempt, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(request.options.timeout.unwrap_or_else(|| self.config.timeout()));

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        // A caller-supplied Authorization only applies to the first attempt
        let mut headers = request.options.headers.clone();
        if attempt == Attempt::AfterRefresh {
            headers.remove(header::AUTHORIZATION);
        }
        let use_stored = !headers.contains_key(header::AUTHORIZATION);
        builder = builder.headers(headers);
        // Re-read every attempt so the retry carries the refreshed token
        if use_stored {
            if let Some(token) = self.stored_token(TokenKind::Access).await {
                builder = builder.bearer_auth(token);
            }
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = ClientError::classify(e);
                warn!(url = %request.url, error = %error, "Request failed before a response arrived");
                return Outcome::Settled(ResponseEnvelope::transport(&error));
            }
        };

        let status = response.status();
        if self.is_auth_failure(status) {
            return Outcome::Rejected(status);
        }
        if !status.is_success() {
            debug!(url = %request.url, status = status.as_u16(), "Server returned an error status");
            return Outcome::Settled(ResponseEnvelope::failure(
                status.as_u16(),
                &ClientError::from_status(status),
            ));
        }

        match response.bytes().await {
            Ok(bytes) => Outcome::Settled(ResponseEnvelope::success(
                status.as_u16(),
                parse_body(&bytes),
            )),
            Err(e) => Outcome::Settled(ResponseEnvelope::transport(&ClientError::classify(e))),
        }
    }

    /// Terminal state of a chain: forget the credentials and tell the app
    async fn expire<T>(&self, status: StatusCode) -> ResponseEnvelope<T> {
        warn!(status = status.as_u16(), "Session expired, clearing stored credentials");
        if let Err(e) = self.store.clear_tokens().await {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.expiry.trigger();
        ResponseEnvelope::failure(status.as_u16(), &ClientError::SessionExpired)
    }

    fn is_auth_failure(&self, status: StatusCode) -> bool {
        self.config.auth_failure_statuses.contains(&status.as_u16())
    }

    /// Read a token; storage failures count as "no token"
    async fn stored_token(&self, kind: TokenKind) -> Option<String> {
        match self.store.get_token(kind).await {
            Ok(token) => token,
            Err(e) => {
                warn!(%kind, error = %e, "Failed to read stored token");
                None
            }
        }
    }
}

/// Body as JSON, or `None` when empty or unparseable
fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes)
        .map_err(|e| debug!(error = %e, "Response body is not the expected JSON"))
        .ok()
}

/// Token from an `Authorization: Bearer ...` response header
fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Builder for StorefrontClient
#[derive(Default)]
pub struct StorefrontClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    auth_failure_statuses: Option<Vec<u16>>,
    store: Option<Arc<dyn TokenStore>>,
    expiry: Option<ExpirySignal>,
}

impl StorefrontClientBuilder {
    /// Start from a loaded configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Statuses that trigger the refresh protocol
    pub fn auth_failure_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.auth_failure_statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Credential storage; defaults to an in-memory store
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Expiry signal; defaults to one with no handler
    pub fn expiry_signal(mut self, signal: ExpirySignal) -> Self {
        self.expiry = Some(signal);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<StorefrontClient, ClientError> {
        let has_config = self.config.is_some();
        let mut config = self.config.unwrap_or_default();

        match self.base_url {
            Some(base_url) => config.base_url = base_url,
            None if !has_config => {
                return Err(ClientError::Configuration("base_url is required".into()));
            }
            None => {}
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(statuses) = self.auth_failure_statuses {
            config.auth_failure_statuses = statuses;
        }

        // Logical paths are appended without their leading slash
        if !config.base_url.ends_with('/') {
            config.base_url.push('/');
        }
        config.validate()?;

        let client = ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(StorefrontClient {
            client,
            config: Arc::new(config),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            expiry: self.expiry.unwrap_or_default(),
        })
    }
}
