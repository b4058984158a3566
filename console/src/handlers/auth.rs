use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::access::resolve;
use crate::models::AuthSession;
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub redirect: String,
}

#[derive(Deserialize)]
pub struct LoginPageParams {
    #[serde(default)]
    pub redirect: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub redirect: String,
}

pub async fn login_page(Query(params): Query<LoginPageParams>) -> impl IntoResponse {
    LoginTemplate {
        redirect: params.redirect,
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> impl IntoResponse {
    let granted = state
        .sessions
        .backend()
        .sign_in_with_password(&payload.email, &payload.password)
        .await;

    let granted = match granted {
        Ok(granted) => granted,
        Err(e) => {
            tracing::info!(email = %payload.email, error = %e, "Sign-in rejected");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html("<p class='text-red-500 text-sm'>Correo o contrase&ntilde;a incorrectos</p>"),
            )
                .into_response();
        }
    };

    if let Err(e) = state
        .sessions
        .establish(&session, &granted.access_token, &granted.identity)
        .await
    {
        tracing::error!(error = %e, "Failed to persist session after sign-in");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<p class='text-red-500 text-sm'>Error de autenticaci&oacute;n</p>"),
        )
            .into_response();
    }

    // Role load failures downgrade to the most restrictive resolution; the
    // user lands on the public index instead of a protected page.
    let access = match state.sessions.roles_for(granted.identity.id).await {
        Ok(rows) => resolve(&rows),
        Err(e) => {
            tracing::warn!(user_id = %granted.identity.id, error = %e, "Role load failed at sign-in");
            crate::access::ResolvedAccess::none()
        }
    };

    tracing::info!(
        user_id = %granted.identity.id,
        email = %granted.identity.email,
        role = ?access.primary_role,
        "User logged in"
    );

    state.cache.sign_in(AuthSession {
        identity: granted.identity,
        access: access.clone(),
    });

    let destination = forward_target(&payload.redirect)
        .unwrap_or_else(|| access.landing_route().to_string());
    Redirect::to(&destination).into_response()
}

pub async fn logout_handler(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    state.sessions.sign_out(&session).await;
    state.cache.sign_out();
    Redirect::to("/")
}

/// Only forward to local paths; anything else falls back to the role's
/// landing route.
fn forward_target(redirect: &str) -> Option<String> {
    if redirect.starts_with('/') && !redirect.starts_with("//") {
        Some(redirect.to_string())
    } else {
        None
    }
}
