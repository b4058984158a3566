//! Process-wide hydrated session cache: one writer path, many readers.
//!
//! Readers subscribe through a watch channel and always observe a complete
//! `AuthSession` (identity and roles replaced as one value). Exactly three
//! operations mutate the cache: hydrate, sign-in, sign-out. An epoch counter
//! guards hydration: results of an in-flight load started before a
//! sign-in/sign-out are discarded instead of clobbering the newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::AuthSession;

/// Observable cache state. `Pending` is the pre-hydration state; guards must
/// render nothing but a loading surface while it lasts.
#[derive(Debug, Clone, PartialEq)]
pub enum Hydration {
    Pending,
    Ready(Option<AuthSession>),
}

impl Hydration {
    pub fn is_pending(&self) -> bool {
        matches!(self, Hydration::Pending)
    }
}

/// Proof that a hydration attempt started at a given epoch. Completing with
/// a stale ticket is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct HydrationTicket {
    epoch: u64,
}

#[derive(Clone)]
pub struct SessionCache {
    tx: Arc<watch::Sender<Hydration>>,
    epoch: Arc<AtomicU64>,
}

impl SessionCache {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Hydration::Pending);
        Self {
            tx: Arc::new(tx),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Hydration> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Hydration {
        self.tx.borrow().clone()
    }

    /// Start a hydration attempt against the current epoch.
    pub fn begin_hydration(&self) -> HydrationTicket {
        HydrationTicket {
            epoch: self.epoch.load(Ordering::Acquire),
        }
    }

    /// Apply a hydration result. Returns false (and changes nothing) when a
    /// sign-in or sign-out happened after the ticket was issued.
    pub fn complete_hydration(
        &self,
        ticket: HydrationTicket,
        session: Option<AuthSession>,
    ) -> bool {
        if self.epoch.load(Ordering::Acquire) != ticket.epoch {
            tracing::debug!("Discarding stale session hydration result");
            return false;
        }
        self.tx.send_replace(Hydration::Ready(session));
        true
    }

    pub fn sign_in(&self, session: AuthSession) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.tx.send_replace(Hydration::Ready(Some(session)));
    }

    pub fn sign_out(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.tx.send_replace(Hydration::Ready(None));
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::resolve;
    use crate::models::{Identity, RoleAssignment, RoleTag};
    use chrono::Utc;
    use uuid::Uuid;

    fn session_for(rol: RoleTag) -> AuthSession {
        AuthSession {
            identity: Identity {
                id: Uuid::new_v4(),
                email: "ana@example.com".to_string(),
            },
            access: resolve(&[RoleAssignment {
                usuario_id: Uuid::new_v4(),
                rol,
                lavanderia_id: None,
                activo: true,
                updated_at: Utc::now(),
            }]),
        }
    }

    #[tokio::test]
    async fn starts_pending() {
        let cache = SessionCache::new();
        assert!(cache.snapshot().is_pending());
    }

    #[tokio::test]
    async fn hydration_publishes_atomically_to_subscribers() {
        let cache = SessionCache::new();
        let mut rx = cache.subscribe();

        let ticket = cache.begin_hydration();
        assert!(cache.complete_hydration(ticket, Some(session_for(RoleTag::Cliente))));

        rx.changed().await.unwrap();
        match &*rx.borrow() {
            Hydration::Ready(Some(session)) => {
                assert_eq!(session.access.primary_role, Some(RoleTag::Cliente));
                assert_eq!(session.identity.email, "ana@example.com");
            }
            other => panic!("unexpected state: {other:?}"),
        };
    }

    #[tokio::test]
    async fn stale_hydration_result_is_discarded_after_sign_out() {
        let cache = SessionCache::new();

        let ticket = cache.begin_hydration();
        cache.sign_out();
        assert!(!cache.complete_hydration(ticket, Some(session_for(RoleTag::Superadmin))));

        // The sign-out outcome survives.
        assert_eq!(cache.snapshot(), Hydration::Ready(None));
    }

    #[tokio::test]
    async fn stale_hydration_result_is_discarded_after_sign_in() {
        let cache = SessionCache::new();
        let ticket = cache.begin_hydration();

        cache.sign_in(session_for(RoleTag::Superadmin));
        assert!(!cache.complete_hydration(ticket, None));

        match cache.snapshot() {
            Hydration::Ready(Some(session)) => {
                assert!(session.access.is_global_admin);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_out_notifies_existing_readers() {
        let cache = SessionCache::new();
        let ticket = cache.begin_hydration();
        cache.complete_hydration(ticket, Some(session_for(RoleTag::Cliente)));

        let mut rx = cache.subscribe();
        cache.sign_out();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Hydration::Ready(None));
    }
}
