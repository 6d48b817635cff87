//! Login, logout and the stored session

use super::error::ClientError;
use super::request::ApiRequest;
use super::{Attempt, Outcome, RequestOptions, ResponseEnvelope, StorefrontClient, bearer_from_headers};
use crate::types::{ApiResponse, LoginRequest, LoginResponse};
use reqwest::Method;
use serde_json::Value;
use storefront_core::{SessionRecord, TokenPair};
use tracing::{info, warn};

impl StorefrontClient {
    /// Log in and persist the issued credentials and session record.
    ///
    /// Login bypasses the refresh protocol: a rejected login is reported as a
    /// plain HTTP error and never fires the expiry signal.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> ResponseEnvelope<ApiResponse<LoginResponse>> {
        let url = self.resolve_url(&self.config.login_path);
        info!(email, "Logging in");

        let result = self
            .client
            .post(&url)
            .timeout(self.config.timeout())
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => return ResponseEnvelope::transport(&ClientError::classify(e)),
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Login rejected");
            return ResponseEnvelope::failure(status.as_u16(), &ClientError::from_status(status));
        }

        let header_token = bearer_from_headers(response.headers());
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<ApiResponse<LoginResponse>>(&bytes),
            Err(e) => return ResponseEnvelope::transport(&ClientError::classify(e)),
        };
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                return ResponseEnvelope::failure(status.as_u16(), &ClientError::Serialization(e));
            }
        };

        // A wrapped failure is handed back untouched for the caller to render
        if body.success {
            if let Err(e) = self.persist_login(&body, header_token).await {
                warn!(error = %e, "Login succeeded but credentials could not be stored");
                return ResponseEnvelope::failure(status.as_u16(), &e);
            }
            info!("Logged in");
        }

        ResponseEnvelope::success(status.as_u16(), Some(body))
    }

    async fn persist_login(
        &self,
        body: &ApiResponse<LoginResponse>,
        header_token: Option<String>,
    ) -> Result<(), ClientError> {
        let content = body
            .content
            .as_ref()
            .ok_or_else(|| ClientError::InvalidResponse("login response has no content".into()))?;

        let access_token = content
            .access_token
            .clone()
            .or(header_token)
            .ok_or_else(|| ClientError::InvalidResponse("login response has no access token".into()))?;
        let refresh_token = content.refresh_token.clone().ok_or_else(|| {
            ClientError::InvalidResponse("login response has no refresh token".into())
        })?;

        self.store
            .set_tokens(&TokenPair::new(access_token, refresh_token))
            .await?;

        if let (Some(member), Some(role)) = (&content.member_dto, content.role) {
            self.store
                .set_session(&SessionRecord {
                    member_id: member.id,
                    nickname: member.nickname.clone(),
                    role,
                })
                .await?;
        }
        Ok(())
    }

    /// Tell the server to end the session, then forget local credentials
    /// whatever it answered.
    pub async fn logout(&self) -> ResponseEnvelope<Value> {
        let request = ApiRequest {
            method: Method::DELETE,
            url: self.resolve_url(&self.config.logout_path),
            body: None,
            options: RequestOptions::default(),
        };

        let envelope = match self.attempt(&request, Attempt::Initial).await {
            Outcome::Settled(envelope) => envelope,
            Outcome::Rejected(status) => {
                ResponseEnvelope::failure(status.as_u16(), &ClientError::from_status(status))
            }
        };

        if let Err(e) = self.store.clear_tokens().await {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        info!(status = envelope.status, "Logged out");
        envelope
    }

    /// Currently stored session record
    pub async fn session(&self) -> Result<Option<SessionRecord>, ClientError> {
        Ok(self.store.session().await?)
    }
}
