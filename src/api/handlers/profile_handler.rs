//! Profile handlers for the authenticated account.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentSession;
use crate::api::AppState;
use crate::config::{MAX_NICKNAME_LENGTH, MIN_NICKNAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::domain::AccountResponse;
use crate::errors::AppResult;

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// New password (minimum 8 characters)
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecurePass456!", min_length = 8)]
    pub new_password: String,
}

/// Nickname change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeNicknameRequest {
    /// New display nickname (3-20 characters)
    #[validate(length(
        min = MIN_NICKNAME_LENGTH,
        max = MAX_NICKNAME_LENGTH,
        message = "Nickname must be 3-20 characters"
    ))]
    #[schema(example = "new_nickname")]
    pub nickname: String,
}

/// Create profile routes (session required)
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/password", put(change_password))
        .route("/nickname", put(change_nickname))
}

/// Get the current account
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> AppResult<Json<AccountResponse>> {
    let principal = session.principal()?;
    let account = state.account_service.get_account(principal.account_id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Change the account password
#[utoipa::path(
    put,
    path = "/profile/password",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<AccountResponse>> {
    let principal = session.principal()?;
    let account = state.account_service.get_account(principal.account_id).await?;

    let updated = state
        .account_service
        .change_password(&account, &payload.new_password)
        .await?;

    Ok(Json(AccountResponse::from(updated)))
}

/// Change the account nickname
///
/// Re-establishes the session afterwards so the stored principal
/// reflects the new nickname.
#[utoipa::path(
    put,
    path = "/profile/nickname",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ChangeNicknameRequest,
    responses(
        (status = 200, description = "Nickname changed", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Nickname already taken")
    )
)]
pub async fn change_nickname(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    ValidatedJson(payload): ValidatedJson<ChangeNicknameRequest>,
) -> AppResult<Json<AccountResponse>> {
    let principal = session.principal()?;
    let account = state.account_service.get_account(principal.account_id).await?;

    let mut ctx = session.context.clone();
    let updated = state
        .account_service
        .change_nickname(&account, &payload.nickname, &mut ctx)
        .await?;

    // Persist the refreshed context under the same session token.
    state.sessions.save(&session.token, &ctx).await?;

    Ok(Json(AccountResponse::from(updated)))
}
