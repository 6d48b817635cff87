//! JSON file token store
//!
//! Keeps credentials across process restarts. The file holds a single JSON
//! object with the keys `accessToken`, `refreshToken` and `session`; a missing
//! file reads as an empty store.

use crate::{Result, SessionRecord, TokenKind, TokenPair, TokenStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Persisted {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<SessionRecord>,
}

pub struct FileTokenStore {
    path: PathBuf,
    // read-modify-write cycles from this process must not interleave
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Persisted> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Persisted::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Persisted::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, persisted: &Persisted) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write then rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(persisted)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn update(&self, f: impl FnOnce(&mut Persisted) + Send) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut persisted = self.load().await?;
        f(&mut persisted);
        self.save(&persisted).await
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get_token(&self, kind: TokenKind) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let persisted = self.load().await?;
        Ok(match kind {
            TokenKind::Access => persisted.access_token,
            TokenKind::Refresh => persisted.refresh_token,
        })
    }

    async fn set_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.update(|p| {
            p.access_token = Some(tokens.access_token.clone());
            p.refresh_token = Some(tokens.refresh_token.clone());
        })
        .await
    }

    async fn session(&self) -> Result<Option<SessionRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.session)
    }

    async fn set_session(&self, record: &SessionRecord) -> Result<()> {
        self.update(|p| p.session = Some(record.clone())).await
    }

    async fn clear_tokens(&self) -> Result<()> {
        self.update(|p| *p = Persisted::default()).await
    }
}
