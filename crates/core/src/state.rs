use crate::{Result, SessionRecord, TokenKind, TokenPair};
use async_trait::async_trait;

/// Persisted credential storage shared by every request chain.
///
/// Implementations decide the medium (process memory, a JSON file, an OS
/// keychain). Nothing here serializes concurrent writers: two chains that
/// refresh at the same time will both call `set_tokens`, and the last write
/// wins.
#[async_trait]
pub trait TokenStore: Send + Sync {
    // Tokens
    async fn get_token(&self, kind: TokenKind) -> Result<Option<String>>;
    async fn set_tokens(&self, tokens: &TokenPair) -> Result<()>;

    // Session record
    async fn session(&self) -> Result<Option<SessionRecord>>;
    async fn set_session(&self, record: &SessionRecord) -> Result<()>;

    /// Erase both tokens and the session record
    async fn clear_tokens(&self) -> Result<()>;
}

// Mock implementation for testing
#[cfg(any(test, feature = "tests"))]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub TokenStore {}

        #[async_trait]
        impl TokenStore for TokenStore {
            async fn get_token(&self, kind: TokenKind) -> Result<Option<String>>;
            async fn set_tokens(&self, tokens: &TokenPair) -> Result<()>;
            async fn session(&self) -> Result<Option<SessionRecord>>;
            async fn set_session(&self, record: &SessionRecord) -> Result<()>;
            async fn clear_tokens(&self) -> Result<()>;
        }
    }
}
