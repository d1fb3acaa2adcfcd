//! Service container - the composition root.
//!
//! Collaborators are supplied through constructor parameters (trait
//! objects); nothing is resolved from global state.

use std::sync::Arc;

use super::AccountService;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get the account service
    fn accounts(&self) -> Arc<dyn AccountService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    account_service: Arc<dyn AccountService>,
}

impl Services {
    /// Create a container from already constructed services
    pub fn new(account_service: Arc<dyn AccountService>) -> Self {
        Self { account_service }
    }

    /// Wire the full service graph from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        use super::AccountManager;

        let uow = Arc::new(Persistence::new(db));
        let account_service = Arc::new(AccountManager::new(uow));

        Self { account_service }
    }
}

impl ServiceContainer for Services {
    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }
}
