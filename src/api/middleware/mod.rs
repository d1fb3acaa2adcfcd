//! HTTP middleware.

mod session;

pub use session::{bearer_token, require_admin, session_middleware, CurrentSession};
