//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, SessionStore};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize database
    let db = Arc::new(Database::connect(&config).await);
    tracing::info!("Database connected");

    // Initialize Redis session store
    let sessions = Arc::new(SessionStore::connect(&config).await);

    // Create application state wired through the composition root
    let app_state = AppState::from_config(db, sessions);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
