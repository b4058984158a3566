pub mod backend;
pub mod error;
pub mod session;
pub mod session_cache;

pub use backend::{BackendApi, BackendError, HttpBackend, SignInResponse};
pub use error::AuthError;
pub use session::SessionService;
pub use session_cache::{Hydration, HydrationTicket, SessionCache};
