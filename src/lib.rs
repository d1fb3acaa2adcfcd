//! Gopang account service
//!
//! Account layer for the gopang shop: registration, password encoding,
//! session establishment, email verification, profile mutations, and an
//! admin member search.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Account entity and value objects
//! - **security**: Principals, authorities, and the security context
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, sessions)
//! - **api**: HTTP handlers, middleware, and routes
//! - **jobs**: Background email jobs
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod security;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, Password, Role, UserType};
pub use errors::{AppError, AppResult};
pub use security::{AccountPrincipal, SecurityContext};
