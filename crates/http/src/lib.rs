//! Authenticated HTTP client for the storefront commerce API
//!
//! Wraps every call in a token-refresh-and-retry protocol and reports the
//! result as a [`ResponseEnvelope`] instead of an error.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{
    ClientConfig, ExpirySignal, RequestOptions, ResponseEnvelope, StorefrontClient,
    StorefrontClientBuilder,
};
pub use types::ApiResponse;
