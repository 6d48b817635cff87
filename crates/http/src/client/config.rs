//! Client configuration

use super::error::ClientError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for [`StorefrontClient`](super::StorefrontClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Remote API base URL; logical `/api` paths are rewritten onto it
    pub base_url: String,

    /// Path prefix that marks a logical API path
    pub api_prefix: String,

    /// Token refresh endpoint
    pub refresh_path: String,

    /// Login endpoint
    pub login_path: String,

    /// Logout endpoint
    pub logout_path: String,

    /// Default per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Statuses treated as "credentials rejected". The backend answers
    /// invalid or rotated tokens with 404, so it is included by default.
    pub auth_failure_statuses: Vec<u16>,

    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            api_prefix: "/api".to_string(),
            refresh_path: "/api/auth/refresh".to_string(),
            login_path: "/api/auth/login".to_string(),
            logout_path: "/api/auth/logout".to_string(),
            timeout_ms: 10_000,
            auth_failure_statuses: vec![401, 403, 404],
            user_agent: concat!("storefront-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file, with `STOREFRONT_*` environment
    /// variables taking precedence
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the result fails validation
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        Self::load(Some(path.as_ref()))
    }

    /// Load configuration from defaults and `STOREFRONT_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(None)
    }

    fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let defaults = Self::default();
        let statuses: Vec<i64> = defaults
            .auth_failure_statuses
            .iter()
            .map(|s| i64::from(*s))
            .collect();

        let mut builder = config::Config::builder()
            // Set default values
            .set_default("base_url", defaults.base_url)?
            .set_default("api_prefix", defaults.api_prefix)?
            .set_default("refresh_path", defaults.refresh_path)?
            .set_default("login_path", defaults.login_path)?
            .set_default("logout_path", defaults.logout_path)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("auth_failure_statuses", statuses)?
            .set_default("user_agent", defaults.user_agent)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("STOREFRONT")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth_failure_statuses"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings for values the client cannot work with
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` describing the first problem found
    pub fn validate(&self) -> Result<(), ClientError> {
        url::Url::parse(&self.base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base_url {:?}: {e}", self.base_url))
        })?;

        if !self.api_prefix.starts_with('/') {
            return Err(ClientError::Configuration(
                "api_prefix must start with '/'".into(),
            ));
        }
        for (name, endpoint) in [
            ("refresh_path", &self.refresh_path),
            ("login_path", &self.login_path),
            ("logout_path", &self.logout_path),
        ] {
            if !endpoint.starts_with(&self.api_prefix) && url::Url::parse(endpoint).is_err() {
                return Err(ClientError::Configuration(format!(
                    "{name} {endpoint:?} must start with api_prefix {:?} or be an absolute URL",
                    self.api_prefix
                )));
            }
        }
        if self.auth_failure_statuses.is_empty() {
            return Err(ClientError::Configuration(
                "auth_failure_statuses must not be empty".into(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Configuration(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
