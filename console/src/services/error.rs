use console_core::error::AppError;
use thiserror::Error;

use super::backend::BackendError;

/// Authorization-path failures, kept distinct because the gate treats them
/// differently: an unavailable session check degrades to "unauthenticated",
/// a failed role load degrades to "no qualifying role".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session check unavailable: {0}")]
    Unavailable(#[source] BackendError),

    #[error("role assignments could not be loaded: {0}")]
    RoleLoad(#[source] BackendError),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unavailable(e) => AppError::BadGateway(e.to_string()),
            AuthError::RoleLoad(e) => AppError::BadGateway(e.to_string()),
            AuthError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            AuthError::Backend(e) => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}
