//! Application state - Dependency injection container for Axum.

use std::sync::Arc;

use crate::infra::{Database, SessionStore};
use crate::services::{AccountService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Account service
    pub account_service: Arc<dyn AccountService>,
    /// Redis-backed session store
    pub sessions: Arc<SessionStore>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from connected infrastructure.
    ///
    /// Wires the service graph through the `Services` composition root.
    pub fn from_config(database: Arc<Database>, sessions: Arc<SessionStore>) -> Self {
        let container = Services::from_connection(database.get_connection());

        Self {
            account_service: container.accounts(),
            sessions,
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    pub fn new(
        account_service: Arc<dyn AccountService>,
        sessions: Arc<SessionStore>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            account_service,
            sessions,
            database,
        }
    }
}
