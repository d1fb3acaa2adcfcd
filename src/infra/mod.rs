//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Redis session persistence
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod session_store;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{AccountRepository, AccountStore};
pub use session_store::SessionStore;
pub use unit_of_work::{Persistence, TransactionContext, TxAccountRepository, UnitOfWork};
