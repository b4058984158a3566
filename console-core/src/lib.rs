//! console-core: shared infrastructure for the LaundryPro console workspace.
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
