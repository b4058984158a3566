//! Role resolution: from raw `roles_app` rows to effective capabilities.
//!
//! Pure and deterministic; the same row set resolves identically regardless
//! of row order or duplication.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::models::{RoleAssignment, RoleTag, ROLE_PRIORITY};

/// Effective capabilities of one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAccess {
    /// Qualifying role tags. A `encargado` row without a tenant binding is
    /// not a valid staff grant and does not appear here.
    pub roles: BTreeSet<RoleTag>,
    /// Highest-priority role among the qualifying ones, per `ROLE_PRIORITY`.
    pub primary_role: Option<RoleTag>,
    pub is_global_admin: bool,
    /// Tenant the staff role is bound to, when `encargado` qualifies.
    pub staff_laundry_id: Option<Uuid>,
}

impl ResolvedAccess {
    /// The most restrictive resolution: authenticated but without any
    /// capability. Used when role rows cannot be loaded.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_any(&self, required: &[RoleTag]) -> bool {
        self.is_global_admin || required.iter().any(|r| self.roles.contains(r))
    }

    /// Where this user lands after authentication. Role-dependent so that no
    /// landing route ever bounces its own role back to `/login`.
    pub fn landing_route(&self) -> &'static str {
        match self.primary_role {
            Some(RoleTag::Superadmin) => "/admin",
            Some(RoleTag::Encargado) => "/staff",
            Some(RoleTag::Cliente) => "/portal",
            None => "/",
        }
    }
}

/// Reduce a set of grant rows to effective capabilities.
///
/// Inactive rows are dropped first; an unbound `encargado` row is dropped
/// with them. The primary role is the first entry of `ROLE_PRIORITY` present
/// in the surviving set. When several bound staff rows exist, the tenant of
/// the most recently updated one wins (ties broken by tenant id) so the
/// outcome does not depend on row order.
pub fn resolve(assignments: &[RoleAssignment]) -> ResolvedAccess {
    let mut roles = BTreeSet::new();
    let mut staff_laundry_id: Option<(chrono::DateTime<chrono::Utc>, Uuid)> = None;

    for assignment in assignments.iter().filter(|a| a.activo) {
        match assignment.rol {
            RoleTag::Encargado => {
                let Some(tenant) = assignment.lavanderia_id else {
                    // Not a valid staff grant without a tenant binding.
                    continue;
                };
                roles.insert(RoleTag::Encargado);
                let candidate = (assignment.updated_at, tenant);
                if staff_laundry_id.map_or(true, |current| candidate > current) {
                    staff_laundry_id = Some(candidate);
                }
            }
            tag => {
                roles.insert(tag);
            }
        }
    }

    let primary_role = ROLE_PRIORITY.iter().copied().find(|r| roles.contains(r));

    ResolvedAccess {
        is_global_admin: roles.contains(&RoleTag::Superadmin),
        staff_laundry_id: staff_laundry_id.map(|(_, tenant)| tenant),
        primary_role,
        roles,
    }
}
