use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::access::ResolvedAccess;

/// An authenticated user handle, independent of any role it may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

impl Identity {
    pub fn display_name(&self) -> String {
        self.email.split('@').next().unwrap_or("User").to_string()
    }
}

/// The value published to the client-side session cache: one identity paired
/// with its resolved roles, always replaced as a single unit so readers
/// never see a new identity with stale roles.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub identity: Identity,
    pub access: ResolvedAccess,
}

/// Authenticated user context extracted from the cookie session.
///
/// Handlers behind the access gate use this for display purposes; the gate
/// has already made the authorization decision by the time it runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let access_token: Option<String> = session.get("access_token").await.unwrap_or(None);
        let user_id: Option<Uuid> = session.get("user_id").await.unwrap_or(None);
        let email: Option<String> = session.get("email").await.unwrap_or(None);

        match (access_token, user_id, email) {
            (Some(token), Some(uid), Some(email_val)) => Ok(CurrentUser {
                user_id: uid,
                email: email_val,
                access_token: token,
            }),
            _ => Err(Redirect::to("/login").into_response()),
        }
    }
}

impl CurrentUser {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.user_id,
            email: self.email.clone(),
        }
    }
}
