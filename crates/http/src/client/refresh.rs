//! Token refresh sub-procedure

use super::error::ClientError;
use super::{StorefrontClient, bearer_from_headers};
use crate::types::{ApiResponse, RefreshRequest, RefreshedTokens};
use std::time::Duration;
use storefront_core::{TokenKind, TokenPair};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub(crate) enum RefreshOutcome {
    /// Proceed with the retry
    Refreshed,
    /// Nothing more can be done for this session
    Expired,
    /// The refresh call got no answer; stored credentials are untouched
    Transport(ClientError),
}

impl StorefrontClient {
    /// Exchange the stored refresh token for new credentials.
    ///
    /// Issues at most one network call and persists whatever tokens the
    /// server hands back. Never touches the expiry signal; the caller decides
    /// what an `Expired` outcome means for its chain.
    pub(crate) async fn refresh(&self, timeout: Duration) -> RefreshOutcome {
        let Some(refresh_token) = self.stored_token(TokenKind::Refresh).await else {
            info!("No refresh token stored, session cannot be renewed");
            return RefreshOutcome::Expired;
        };

        let url = self.resolve_url(&self.config.refresh_path);
        info!(url = %url, "Refreshing access token");

        let result = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&RefreshRequest {
                refresh_token: refresh_token.clone(),
            })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let error = ClientError::classify(e);
                warn!(error = %error, "Token refresh request failed");
                return RefreshOutcome::Transport(error);
            }
        };

        let status = response.status();
        if self.is_auth_failure(status) {
            warn!(status = status.as_u16(), "Refresh token rejected");
            return RefreshOutcome::Expired;
        }

        let header_token = bearer_from_headers(response.headers());
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<ApiResponse<RefreshedTokens>>(&bytes),
            Err(e) => {
                let error = ClientError::classify(e);
                warn!(error = %error, "Failed to read refresh response");
                return RefreshOutcome::Transport(error);
            }
        };
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "Refresh response is not a valid API response");
                return RefreshOutcome::Expired;
            }
        };
        if !body.success {
            warn!(
                code = body.code.as_deref().unwrap_or_default(),
                message = body.message.as_deref().unwrap_or_default(),
                "Server refused to refresh the session"
            );
            return RefreshOutcome::Expired;
        }

        let tokens = body.content.unwrap_or_default();
        match tokens.access_token.or(header_token) {
            Some(access_token) => {
                let pair = TokenPair::new(
                    access_token,
                    tokens.refresh_token.unwrap_or(refresh_token),
                );
                if let Err(e) = self.store.set_tokens(&pair).await {
                    warn!(error = %e, "Failed to persist refreshed tokens");
                }
                info!("Access token refreshed");
            }
            None => debug!("Refresh response carried no access token, keeping stored credentials"),
        }

        RefreshOutcome::Refreshed
    }
}
