pub mod role;
pub mod user;

pub use role::{RoleAssignment, RoleTag, ROLE_PRIORITY};
pub use user::{AuthSession, CurrentUser, Identity};
