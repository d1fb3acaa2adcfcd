//! Session authentication middleware.
//!
//! Resolves the bearer session token against the Redis store and injects
//! the loaded security context into the request extensions. Handlers that
//! mutate the context write it back through the store explicitly.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;
use crate::security::{AccountPrincipal, SecurityContext};

/// The caller's session, loaded once per request.
#[derive(Clone, Debug)]
pub struct CurrentSession {
    /// Opaque session token from the Authorization header
    pub token: String,
    /// Security context as persisted in the store
    pub context: SecurityContext,
}

impl CurrentSession {
    /// The authenticated principal. The middleware rejects sessions
    /// without one, so this is always present past the middleware.
    pub fn principal(&self) -> Result<&AccountPrincipal, AppError> {
        self.context.principal().ok_or(AppError::Unauthorized)
    }

    pub fn is_admin(&self) -> bool {
        self.context
            .principal()
            .map(|p| p.is_admin())
            .unwrap_or(false)
    }
}

/// Extract the bearer session token from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(|t| t.to_string())
        .ok_or(AppError::Unauthorized)
}

/// Session authentication middleware.
///
/// Loads the security context for the presented token and injects a
/// [`CurrentSession`] into the request extensions.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let context = state
        .sessions
        .load(&token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !context.is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    request
        .extensions_mut()
        .insert(CurrentSession { token, context });

    Ok(next.run(request).await)
}

/// Require admin authority, returns Forbidden error if absent.
pub fn require_admin(session: &CurrentSession) -> Result<(), AppError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
