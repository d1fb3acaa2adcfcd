//! Domain layer - Core business entities and logic
//!
//! Contains the account entity, value objects, and search criteria,
//! independent of infrastructure concerns.

pub mod account;
pub mod password;

pub use account::{Account, AccountResponse, MemberSearchCriteria, Role, SignUpForm, UserType};
pub use password::Password;
