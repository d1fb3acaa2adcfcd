//! Authentication handlers: signup, login, logout, email verification.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::bearer_token;
use crate::api::AppState;
use crate::config::{
    MAX_NICKNAME_LENGTH, MIN_NICKNAME_LENGTH, MIN_PASSWORD_LENGTH, TOKEN_TYPE_BEARER,
};
use crate::domain::{AccountResponse, SignUpForm, UserType};
use crate::errors::{AppError, AppResult};
use crate::jobs::{email_job_handler, EmailJob};
use crate::security::SecurityContext;

/// Sign-up request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Display nickname (3-20 characters)
    #[validate(length(
        min = MIN_NICKNAME_LENGTH,
        max = MAX_NICKNAME_LENGTH,
        message = "Nickname must be 3-20 characters"
    ))]
    #[schema(example = "gopang_user")]
    pub nickname: String,
    /// Account password (minimum 8 characters)
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Buyer or seller
    pub user_type: UserType,
}

impl From<SignUpRequest> for SignUpForm {
    fn from(req: SignUpRequest) -> Self {
        Self {
            email: req.email,
            nickname: req.nickname,
            password: req.password,
            user_type: req.user_type,
        }
    }
}

/// Login request. The identifier is an email address or a nickname.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address or nickname
    #[validate(length(min = 1, message = "Identifier is required"))]
    #[schema(example = "user@example.com")]
    pub identifier: String,
    /// Account password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Email verification query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyParams {
    /// Account email address
    pub email: String,
    /// Verification token from the signup email
    pub token: String,
}

/// Session returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Opaque session token, presented as a bearer credential
    #[schema(example = "3f2b7c58-9a41-4c5f-9d6e-08a1b2c3d4e5")]
    pub session_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Session lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: u64,
}

/// Signup result: the new account plus its live session
#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub account: AccountResponse,
    pub session: SessionResponse,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify", get(verify_email))
}

fn session_response(state: &AppState, token: String) -> SessionResponse {
    SessionResponse {
        session_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: state.sessions.ttl_seconds(),
    }
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account registered and logged in", body = SignUpResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or nickname already taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    let (account, token) = state.account_service.process_signup(payload.into()).await?;

    // Fire-and-forget; the verification email is logged in development.
    let job = EmailJob::verification(&account.email, &account.nickname, &token);
    tokio::spawn(async move {
        if let Err(e) = email_job_handler(job).await {
            tracing::warn!("Verification email job failed: {}", e);
        }
    });

    // Original behavior: signup establishes a session immediately.
    let mut ctx = SecurityContext::new();
    state.account_service.login(&account, &mut ctx);
    let session_token = state.sessions.create(&ctx).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            account: AccountResponse::from(account),
            session: session_response(&state, session_token),
        }),
    ))
}

/// Login with email or nickname
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let account = state
        .account_service
        .authenticate(&payload.identifier, &payload.password)
        .await?;

    let mut ctx = SecurityContext::new();
    state.account_service.login(&account, &mut ctx);
    let session_token = state.sessions.create(&ctx).await?;

    Ok(Json(session_response(&state, session_token)))
}

/// Destroy the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session destroyed"),
        (status = 401, description = "No session token presented")
    )
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<StatusCode> {
    let token = bearer_token(&headers)?;
    state.sessions.destroy(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Complete email verification
#[utoipa::path(
    get,
    path = "/auth/verify",
    tag = "Authentication",
    params(VerifyParams),
    responses(
        (status = 200, description = "Email verified, session established", body = SignUpResponse),
        (status = 400, description = "Token mismatch"),
        (status = 401, description = "No account for that email")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> AppResult<Json<SignUpResponse>> {
    let principal = state.account_service.load_principal(&params.email).await?;
    let account = state.account_service.get_account(principal.account_id).await?;

    if !account.verification_token_matches(&params.token) {
        return Err(AppError::BadRequest("Invalid verification token".to_string()));
    }

    // Re-establishes the session so authorities reflect the verified state.
    let mut ctx = SecurityContext::new();
    let account = state
        .account_service
        .complete_registration(&account, &mut ctx)
        .await?;
    let session_token = state.sessions.create(&ctx).await?;

    Ok(Json(SignUpResponse {
        account: AccountResponse::from(account),
        session: session_response(&state, session_token),
    }))
}
