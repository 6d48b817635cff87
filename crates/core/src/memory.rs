//! In-process token store

use crate::{Result, SessionRecord, TokenKind, TokenPair, TokenStore};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
struct Slots {
    access_token: Option<String>,
    refresh_token: Option<String>,
    session: Option<SessionRecord>,
}

/// Token store that lives as long as the process
#[derive(Default)]
pub struct MemoryTokenStore {
    slots: RwLock<Slots>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token pair
    pub fn with_tokens(tokens: &TokenPair) -> Self {
        Self {
            slots: RwLock::new(Slots {
                access_token: Some(tokens.access_token.clone()),
                refresh_token: Some(tokens.refresh_token.clone()),
                session: None,
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self, kind: TokenKind) -> Result<Option<String>> {
        let slots = self.slots.read().await;
        Ok(match kind {
            TokenKind::Access => slots.access_token.clone(),
            TokenKind::Refresh => slots.refresh_token.clone(),
        })
    }

    async fn set_tokens(&self, tokens: &TokenPair) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots.access_token = Some(tokens.access_token.clone());
        slots.refresh_token = Some(tokens.refresh_token.clone());
        Ok(())
    }

    async fn session(&self) -> Result<Option<SessionRecord>> {
        Ok(self.slots.read().await.session.clone())
    }

    async fn set_session(&self, record: &SessionRecord) -> Result<()> {
        self.slots.write().await.session = Some(record.clone());
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<()> {
        *self.slots.write().await = Slots::default();
        Ok(())
    }
}
