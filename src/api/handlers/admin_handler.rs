//! Admin member management handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::middleware::{require_admin, CurrentSession};
use crate::api::AppState;
use crate::domain::{AccountResponse, MemberSearchCriteria, Role, UserType};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Member search filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MemberSearchQuery {
    /// Substring match against email or nickname
    pub keyword: Option<String>,
    /// Filter by role
    pub role: Option<Role>,
    /// Filter by buyer/seller
    pub user_type: Option<UserType>,
    /// Filter by verification state
    pub verified: Option<bool>,
}

impl From<MemberSearchQuery> for MemberSearchCriteria {
    fn from(query: MemberSearchQuery) -> Self {
        Self {
            keyword: query.keyword,
            role: query.role,
            user_type: query.user_type,
            verified: query.verified,
        }
    }
}

/// Create admin routes (session + admin authority required)
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/members", get(search_members))
}

/// Paginated member search
#[utoipa::path(
    get,
    path = "/admin/members",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(MemberSearchQuery),
    responses(
        (status = 200, description = "Page of matching members"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin authority required")
    )
)]
pub async fn search_members(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<MemberSearchQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    require_admin(&session)?;

    let criteria = MemberSearchCriteria::from(query);
    let (accounts, total) = state
        .account_service
        .search_members(&criteria, &pagination)
        .await?;

    let data = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(Json(Paginated::new(
        data,
        pagination.page,
        pagination.limit(),
        total,
    )))
}
