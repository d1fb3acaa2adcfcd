//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, with repository access going through the
//! Unit of Work.

mod account_service;
pub mod container;

pub use account_service::{AccountManager, AccountService};
pub use container::{ServiceContainer, Services};
