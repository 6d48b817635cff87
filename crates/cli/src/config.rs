//! CLI configuration utilities

use anyhow::Result;
use std::path::{Path, PathBuf};
use storefront_http::ClientConfig;

/// Load client configuration from a file, or from the environment alone
pub fn load_client_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };
    Ok(config)
}

/// Directory holding credentials and logs
pub fn state_dir() -> PathBuf {
    // Check environment variable first, then fall back to system data dir
    std::env::var("STOREFRONT_STATE_DIR").map_or_else(
        |_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storefront")
        },
        PathBuf::from,
    )
}

/// Default location of the persisted credentials
pub fn default_token_file() -> PathBuf {
    state_dir().join("credentials.json")
}
