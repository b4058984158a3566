//! Client for the managed backend's auth and query surface.
//!
//! The console depends only on the `BackendApi` contract: a session check, a
//! password grant, a filterable role-assignment table, and sign-out. The
//! production implementation speaks the backend's REST dialect with an
//! `apikey` header plus per-user bearer tokens.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::BackendSettings;
use crate::models::{Identity, RoleAssignment};

#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure: the backend could not be reached at all
    /// (includes the bounded per-call timeout).
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend rejected the request with status {0}")]
    Rejected(StatusCode),

    #[error("unexpected backend response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct SignInResponse {
    pub access_token: String,
    pub identity: Identity,
}

#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Exchange credentials for an access token and the identity it names.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, BackendError>;

    /// Resolve the identity behind an access token. `Ok(None)` means the
    /// token is expired or revoked — a normal signed-out outcome, distinct
    /// from a transport failure.
    async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, BackendError>;

    /// Active grant rows for one identity, in arbitrary order.
    async fn role_assignments(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>, BackendError>;

    /// Invalidate the backend session behind the token.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}

pub struct HttpBackend {
    client: Client,
    settings: BackendSettings,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
}

impl HttpBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        Ok(Self { client, settings })
    }

    fn api_key(&self) -> &str {
        self.settings.api_key.expose_secret()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url, path)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, BackendError> {
        let url = self.url("/auth/v1/token?grant_type=password");
        let response = self
            .client
            .post(&url)
            .header("apikey", self.api_key())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send sign-in request to {}: {}", url, e);
                BackendError::Unreachable(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {
                let tokens: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| BackendError::Malformed(e.to_string()))?;
                Ok(SignInResponse {
                    access_token: tokens.access_token,
                    identity: Identity {
                        id: tokens.user.id,
                        email: tokens.user.email,
                    },
                })
            }
            status => Err(BackendError::Rejected(status)),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, BackendError> {
        let url = self.url("/auth/v1/user");
        let response = self
            .client
            .get(&url)
            .header("apikey", self.api_key())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send session check to {}: {}", url, e);
                BackendError::Unreachable(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {
                let user: UserPayload = response
                    .json()
                    .await
                    .map_err(|e| BackendError::Malformed(e.to_string()))?;
                Ok(Some(Identity {
                    id: user.id,
                    email: user.email,
                }))
            }
            // An expired or revoked token is "no session", not an outage.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => Err(BackendError::Rejected(status)),
        }
    }

    async fn role_assignments(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>, BackendError> {
        let url = self.url(&format!(
            "/rest/v1/roles_app?select=usuario_id,rol,lavanderia_id,activo,updated_at\
             &usuario_id=eq.{}&activo=eq.true",
            user_id
        ));
        let response = self
            .client
            .get(&url)
            .header("apikey", self.api_key())
            .bearer_auth(self.api_key())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to query role assignments: {}", e);
                BackendError::Unreachable(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => response
                .json::<Vec<RoleAssignment>>()
                .await
                .map_err(|e| BackendError::Malformed(e.to_string())),
            status => Err(BackendError::Rejected(status)),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let url = self.url("/auth/v1/logout");
        let response = self
            .client
            .post(&url)
            .header("apikey", self.api_key())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // Already-dead sessions sign out cleanly.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(()),
            status => Err(BackendError::Rejected(status)),
        }
    }
}
