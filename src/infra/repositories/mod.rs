//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod account_repository;
pub mod entities;

pub use account_repository::{AccountRepository, AccountStore};
