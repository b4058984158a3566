//! Server-side session store: cookie session + backend session check.
//!
//! Request-scoped. The cookie session holds the access token and a copy of
//! the identity fields for display; the backend remains the authority on
//! whether the token is still live.

use std::sync::Arc;

use tower_sessions::Session;
use uuid::Uuid;

use crate::models::{Identity, RoleAssignment};

use super::backend::BackendApi;
use super::error::AuthError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";

#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn BackendApi>,
}

impl SessionService {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn BackendApi> {
        &self.backend
    }

    /// The current identity, if any.
    ///
    /// `Ok(None)` is the normal signed-out result (no cookie token, or the
    /// backend says the token is dead). `AuthError::Unavailable` means the
    /// check itself could not be performed and is a different state.
    pub async fn current(&self, session: &Session) -> Result<Option<Identity>, AuthError> {
        let token: Option<String> = session.get(ACCESS_TOKEN_KEY).await.unwrap_or(None);
        let Some(token) = token else {
            return Ok(None);
        };

        self.backend
            .get_user(&token)
            .await
            .map_err(AuthError::Unavailable)
    }

    /// Raw active grant rows for an identity, in arbitrary order; policy
    /// (priority, tenant binding) belongs to the resolver, not here.
    pub async fn roles_for(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>, AuthError> {
        self.backend
            .role_assignments(user_id)
            .await
            .map_err(AuthError::RoleLoad)
    }

    /// Persist a freshly granted session into the cookie store.
    pub async fn establish(
        &self,
        session: &Session,
        access_token: &str,
        identity: &Identity,
    ) -> Result<(), AuthError> {
        let insert = async {
            session.insert(ACCESS_TOKEN_KEY, access_token).await?;
            session.insert(USER_ID_KEY, identity.id).await?;
            session.insert(EMAIL_KEY, &identity.email).await?;
            Ok::<_, tower_sessions::session::Error>(())
        };
        insert.await.map_err(|e| {
            AuthError::Backend(super::backend::BackendError::Malformed(format!(
                "session store write failed: {e}"
            )))
        })
    }

    /// Revoke the backend session, then drop the cookie session. The cookie
    /// is cleared even when revocation fails; a dangling backend session
    /// expires on its own, a dangling cookie would keep the user signed in.
    pub async fn sign_out(&self, session: &Session) {
        if let Some(token) = session
            .get::<String>(ACCESS_TOKEN_KEY)
            .await
            .unwrap_or(None)
        {
            if let Err(e) = self.backend.sign_out(&token).await {
                tracing::error!("Failed to revoke backend session during logout: {}", e);
            } else {
                tracing::info!("Backend session revoked");
            }
        }

        session.clear().await;
    }
}
