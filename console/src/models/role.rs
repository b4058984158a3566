use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role tags as stored in the `roles_app.rol` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleTag {
    Superadmin,
    Encargado,
    Cliente,
}

impl RoleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTag::Superadmin => "superadmin",
            RoleTag::Encargado => "encargado",
            RoleTag::Cliente => "cliente",
        }
    }
}

impl std::fmt::Display for RoleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adding a role later is a data change here, not a new branch in the
/// resolver: the first matching entry wins.
pub const ROLE_PRIORITY: [RoleTag; 3] = [RoleTag::Superadmin, RoleTag::Encargado, RoleTag::Cliente];

/// One grant row from `roles_app`. Revocation is soft: `activo = false`
/// rows stay in the table and must never influence authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub usuario_id: Uuid,
    pub rol: RoleTag,
    /// Tenant binding. Required for a `encargado` row to count as a staff
    /// grant; meaningless for the other roles.
    pub lavanderia_id: Option<Uuid>,
    pub activo: bool,
    pub updated_at: DateTime<Utc>,
}
