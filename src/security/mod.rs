//! Security layer - principals, authorities, and the request-scoped context.

mod context;
mod principal;

pub use context::{Authentication, SecurityContext};
pub use principal::{AccountPrincipal, Authority};
