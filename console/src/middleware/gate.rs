//! I/O shell around the gate state machine.
//!
//! Runs for every request on the application router: reads the cookie
//! session, asks the backend who the caller is, resolves roles, then defers
//! to the pure decision in `crate::access::gate`. All failure mapping lives
//! here so the state machine stays network-free.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::access::{self, GateDecision, ResolvedAccess, RouteCategory, SessionSnapshot};
use crate::services::AuthError;
use crate::AppState;

pub async fn access_gate(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Public paths allow for every snapshot; skip the backend round-trip.
    if state.routes.classify(&path) == RouteCategory::Public {
        return next.run(request).await;
    }

    let snapshot = snapshot_for(&state, &session).await;

    match access::gate::decide(&snapshot, &path, &state.routes) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(to) => {
            tracing::debug!(path = %path, to = %to, "Access gate redirect");
            Redirect::to(&to).into_response()
        }
    }
}

async fn snapshot_for(state: &AppState, session: &Session) -> SessionSnapshot {
    let identity = match state.sessions.current(session).await {
        Ok(Some(identity)) => identity,
        Ok(None) => return SessionSnapshot::Anonymous,
        Err(AuthError::Unavailable(e)) => {
            // Fail open: an unreachable backend degrades protected routes to
            // a login redirect instead of 503ing the whole console. Failing
            // closed would return ServiceUnavailable here instead.
            tracing::warn!(error = %e, "Session check unavailable; treating request as unauthenticated");
            return SessionSnapshot::Unavailable;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session check failed; treating request as unauthenticated");
            return SessionSnapshot::Unavailable;
        }
    };

    match state.sessions.roles_for(identity.id).await {
        Ok(rows) => SessionSnapshot::Authenticated(access::resolve(&rows)),
        Err(e) => {
            // Never show protected content on a role-check failure: resolve
            // to no qualifying role and let the normal redirects apply.
            tracing::warn!(
                user_id = %identity.id,
                error = %e,
                "Role load failed; resolving to no qualifying role"
            );
            SessionSnapshot::Authenticated(ResolvedAccess::none())
        }
    }
}
