//! The gate state machine: one pure decision per request.
//!
//! The middleware shell (`crate::middleware::gate`) resolves the session and
//! roles, then hands this function a snapshot; everything here is testable
//! without a network.

use super::resolver::ResolvedAccess;
use super::routes::{RouteCategory, RouteTable};

/// What the shell learned about the caller before deciding.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSnapshot {
    /// The session check itself failed (backend unreachable). Policy: fail
    /// open and treat as unauthenticated — protected routes still redirect,
    /// public routes stay up. Fail-closed (503) is the one-line alternative
    /// in the shell.
    Unavailable,
    /// No session.
    Anonymous,
    /// A session with resolved capabilities. A role-load failure arrives
    /// here as `ResolvedAccess::none()`.
    Authenticated(ResolvedAccess),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// Login URL that preserves the originally requested path, so the login
/// flow can forward the user after authentication.
pub fn login_redirect(original_path: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(original_path))
}

pub fn decide(snapshot: &SessionSnapshot, path: &str, table: &RouteTable) -> GateDecision {
    let category = table.classify(path);

    let access = match snapshot {
        SessionSnapshot::Authenticated(access) => Some(access),
        SessionSnapshot::Anonymous | SessionSnapshot::Unavailable => None,
    };

    match (access, category) {
        (_, RouteCategory::Public) => GateDecision::Allow,

        (None, RouteCategory::AuthOnly) => GateDecision::Allow,
        (None, _) => GateDecision::Redirect(login_redirect(path)),

        // Signed-in users bounce off the login/register pages to their own
        // landing route.
        (Some(access), RouteCategory::AuthOnly) => {
            GateDecision::Redirect(access.landing_route().to_string())
        }

        // A staff member on an admin URL is down-scoped, not shown an error.
        (Some(access), RouteCategory::AdminOnly) => {
            if access.is_global_admin {
                GateDecision::Allow
            } else {
                GateDecision::Redirect("/staff".to_string())
            }
        }

        (Some(access), RouteCategory::StaffOrAdmin) => {
            if access.is_global_admin || access.staff_laundry_id.is_some() {
                GateDecision::Allow
            } else {
                GateDecision::Redirect(login_redirect("/"))
            }
        }

        (Some(access), RouteCategory::CustomerOnly) => {
            if access.is_global_admin || access.roles.contains(&crate::models::RoleTag::Cliente) {
                GateDecision::Allow
            } else {
                GateDecision::Redirect(login_redirect("/"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::resolver::resolve;
    use crate::models::{RoleAssignment, RoleTag};
    use chrono::Utc;
    use uuid::Uuid;

    fn table() -> RouteTable {
        RouteTable::console()
    }

    fn access_for(rol: RoleTag, lavanderia_id: Option<Uuid>) -> SessionSnapshot {
        SessionSnapshot::Authenticated(resolve(&[RoleAssignment {
            usuario_id: Uuid::new_v4(),
            rol,
            lavanderia_id,
            activo: true,
            updated_at: Utc::now(),
        }]))
    }

    #[test]
    fn anonymous_on_admin_route_is_sent_to_login_with_original_path() {
        let decision = decide(&SessionSnapshot::Anonymous, "/admin/usuarios", &table());
        assert_eq!(
            decision,
            GateDecision::Redirect("/login?redirect=%2Fadmin%2Fusuarios".to_string())
        );
    }

    #[test]
    fn anonymous_on_public_route_passes() {
        assert_eq!(
            decide(&SessionSnapshot::Anonymous, "/", &table()),
            GateDecision::Allow
        );
        assert_eq!(
            decide(&SessionSnapshot::Anonymous, "/precios", &table()),
            GateDecision::Allow
        );
    }

    #[test]
    fn anonymous_reaches_the_login_page() {
        assert_eq!(
            decide(&SessionSnapshot::Anonymous, "/login", &table()),
            GateDecision::Allow
        );
    }

    #[test]
    fn cliente_on_staff_route_is_sent_back_to_login() {
        let decision = decide(&access_for(RoleTag::Cliente, None), "/staff/pedidos", &table());
        assert_eq!(
            decision,
            GateDecision::Redirect("/login?redirect=%2F".to_string())
        );
    }

    #[test]
    fn superadmin_bounces_off_login_to_admin() {
        let decision = decide(&access_for(RoleTag::Superadmin, None), "/login", &table());
        assert_eq!(decision, GateDecision::Redirect("/admin".to_string()));
    }

    #[test]
    fn cliente_bounces_off_login_to_portal() {
        let decision = decide(&access_for(RoleTag::Cliente, None), "/login", &table());
        assert_eq!(decision, GateDecision::Redirect("/portal".to_string()));
    }

    #[test]
    fn staff_on_admin_route_is_down_scoped_not_blocked() {
        let decision = decide(
            &access_for(RoleTag::Encargado, Some(Uuid::new_v4())),
            "/admin",
            &table(),
        );
        assert_eq!(decision, GateDecision::Redirect("/staff".to_string()));
    }

    #[test]
    fn bound_staff_passes_staff_routes() {
        let decision = decide(
            &access_for(RoleTag::Encargado, Some(Uuid::new_v4())),
            "/staff/pedidos/42",
            &table(),
        );
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn unbound_staff_does_not_pass_staff_routes() {
        let decision = decide(&access_for(RoleTag::Encargado, None), "/staff", &table());
        assert_eq!(
            decision,
            GateDecision::Redirect("/login?redirect=%2F".to_string())
        );
    }

    #[test]
    fn superadmin_passes_every_protected_category() {
        let admin = access_for(RoleTag::Superadmin, None);
        for path in ["/admin/planes", "/staff/pedidos", "/portal/pedidos/9"] {
            assert_eq!(decide(&admin, path, &table()), GateDecision::Allow, "{path}");
        }
    }

    #[test]
    fn cliente_passes_the_portal() {
        let decision = decide(&access_for(RoleTag::Cliente, None), "/portal/pedidos", &table());
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn backend_outage_degrades_to_anonymous_behavior() {
        assert_eq!(
            decide(&SessionSnapshot::Unavailable, "/", &table()),
            GateDecision::Allow
        );
        assert_eq!(
            decide(&SessionSnapshot::Unavailable, "/admin", &table()),
            GateDecision::Redirect("/login?redirect=%2Fadmin".to_string())
        );
    }

    #[test]
    fn role_load_failure_resolves_most_restrictive() {
        let snapshot = SessionSnapshot::Authenticated(crate::access::ResolvedAccess::none());
        assert_eq!(
            decide(&snapshot, "/admin", &table()),
            GateDecision::Redirect("/staff".to_string())
        );
        assert_eq!(
            decide(&snapshot, "/staff", &table()),
            GateDecision::Redirect("/login?redirect=%2F".to_string())
        );
    }
}
