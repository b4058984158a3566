//! Render-time guard for client-driven navigation.
//!
//! Mirrors the access gate's decision for already-hydrated state so a
//! protected subtree never flashes before its redirect. While the cache is
//! still pending, the only permitted output is a loading surface; once
//! ready, the decision is recomputed on every cache change, so a sign-out
//! elsewhere in the UI revokes rendering immediately.

use tokio::sync::watch;

use crate::models::RoleTag;
use crate::services::Hydration;

/// What the wrapped subtree may show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Hydration still in flight: render the neutral loading state only.
    Loading,
    /// Requirements satisfied: render the children.
    Show,
    /// Requirements not satisfied: navigate away, render nothing.
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct ProtectedView {
    required_roles: Vec<RoleTag>,
    fallback: String,
}

impl ProtectedView {
    pub fn new(required_roles: Vec<RoleTag>, fallback: impl Into<String>) -> Self {
        Self {
            required_roles,
            fallback: fallback.into(),
        }
    }

    /// Decide from one observed cache state. Pure; drives both the initial
    /// render and every re-evaluation.
    pub fn evaluate(&self, state: &Hydration) -> GuardDecision {
        match state {
            Hydration::Pending => GuardDecision::Loading,
            Hydration::Ready(None) => GuardDecision::Redirect(self.fallback.clone()),
            Hydration::Ready(Some(session)) => {
                if self.required_roles.is_empty() || session.access.has_any(&self.required_roles) {
                    GuardDecision::Show
                } else {
                    GuardDecision::Redirect(self.fallback.clone())
                }
            }
        }
    }

    /// Wait out hydration and return the first real decision. Never yields
    /// `Loading`.
    pub async fn resolve(&self, rx: &mut watch::Receiver<Hydration>) -> GuardDecision {
        loop {
            let decision = self.evaluate(&rx.borrow_and_update().clone());
            if decision != GuardDecision::Loading {
                return decision;
            }
            if rx.changed().await.is_err() {
                // Cache dropped: nothing left to show.
                return GuardDecision::Redirect(self.fallback.clone());
            }
        }
    }

    /// Block until the current decision changes; returns the new one. A
    /// rendering caller loops on this to revoke children the moment the
    /// session changes underneath it.
    pub async fn next_change(
        &self,
        rx: &mut watch::Receiver<Hydration>,
        current: &GuardDecision,
    ) -> GuardDecision {
        loop {
            if rx.changed().await.is_err() {
                return GuardDecision::Redirect(self.fallback.clone());
            }
            let decision = self.evaluate(&rx.borrow_and_update().clone());
            if &decision != current {
                return decision;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::resolve;
    use crate::models::{AuthSession, Identity, RoleAssignment};
    use crate::services::SessionCache;
    use chrono::Utc;
    use uuid::Uuid;

    fn session_for(rol: RoleTag, lavanderia_id: Option<Uuid>) -> AuthSession {
        AuthSession {
            identity: Identity {
                id: Uuid::new_v4(),
                email: "marta@example.com".to_string(),
            },
            access: resolve(&[RoleAssignment {
                usuario_id: Uuid::new_v4(),
                rol,
                lavanderia_id,
                activo: true,
                updated_at: Utc::now(),
            }]),
        }
    }

    #[test]
    fn pending_hydration_renders_only_the_loading_state() {
        let guard = ProtectedView::new(vec![RoleTag::Superadmin], "/login");
        assert_eq!(guard.evaluate(&Hydration::Pending), GuardDecision::Loading);
    }

    #[test]
    fn signed_out_state_redirects_to_the_fallback() {
        let guard = ProtectedView::new(vec![RoleTag::Cliente], "/login");
        assert_eq!(
            guard.evaluate(&Hydration::Ready(None)),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn empty_requirements_admit_any_session() {
        let guard = ProtectedView::new(vec![], "/login");
        let state = Hydration::Ready(Some(session_for(RoleTag::Cliente, None)));
        assert_eq!(guard.evaluate(&state), GuardDecision::Show);
    }

    #[test]
    fn intersecting_role_admits() {
        let guard = ProtectedView::new(vec![RoleTag::Encargado, RoleTag::Superadmin], "/login");
        let state = Hydration::Ready(Some(session_for(
            RoleTag::Encargado,
            Some(Uuid::new_v4()),
        )));
        assert_eq!(guard.evaluate(&state), GuardDecision::Show);
    }

    #[test]
    fn global_admin_passes_every_requirement() {
        let guard = ProtectedView::new(vec![RoleTag::Cliente], "/login");
        let state = Hydration::Ready(Some(session_for(RoleTag::Superadmin, None)));
        assert_eq!(guard.evaluate(&state), GuardDecision::Show);
    }

    #[test]
    fn insufficient_role_redirects() {
        let guard = ProtectedView::new(vec![RoleTag::Superadmin], "/staff");
        let state = Hydration::Ready(Some(session_for(RoleTag::Cliente, None)));
        assert_eq!(
            guard.evaluate(&state),
            GuardDecision::Redirect("/staff".to_string())
        );
    }

    #[tokio::test]
    async fn resolve_waits_out_hydration() {
        let cache = SessionCache::new();
        let guard = ProtectedView::new(vec![RoleTag::Cliente], "/login");
        let mut rx = cache.subscribe();

        let pending = guard.evaluate(&cache.snapshot());
        assert_eq!(pending, GuardDecision::Loading);

        let worker = tokio::spawn({
            let cache = cache.clone();
            async move {
                let ticket = cache.begin_hydration();
                cache.complete_hydration(ticket, Some(session_for(RoleTag::Cliente, None)));
            }
        });

        let decision = guard.resolve(&mut rx).await;
        worker.await.unwrap();
        assert_eq!(decision, GuardDecision::Show);
    }

    #[tokio::test]
    async fn sign_out_revokes_rendering_immediately() {
        let cache = SessionCache::new();
        let guard = ProtectedView::new(vec![RoleTag::Cliente], "/login");
        let mut rx = cache.subscribe();

        let ticket = cache.begin_hydration();
        cache.complete_hydration(ticket, Some(session_for(RoleTag::Cliente, None)));
        let shown = guard.resolve(&mut rx).await;
        assert_eq!(shown, GuardDecision::Show);

        cache.sign_out();
        let revoked = guard.next_change(&mut rx, &shown).await;
        assert_eq!(revoked, GuardDecision::Redirect("/login".to_string()));
    }
}
