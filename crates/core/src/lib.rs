//! Storefront core types: credentials, session record and the token store port

pub mod errors;
pub mod file;
pub mod memory;
pub mod state;
pub mod types;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use errors::{Error, Result};
pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;
pub use state::TokenStore;
pub use types::{Role, SessionRecord, TokenKind, TokenPair};
