//! The access-control core: pure role resolution, route classification, and
//! the gate state machine. Nothing in this module performs I/O; the
//! middleware shell in `crate::middleware::gate` feeds it.

pub mod gate;
pub mod resolver;
pub mod routes;

pub use gate::{GateDecision, SessionSnapshot};
pub use resolver::{resolve, ResolvedAccess};
pub use routes::{RouteCategory, RouteTable};
