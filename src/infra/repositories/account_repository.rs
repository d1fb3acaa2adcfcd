//! Account repository - persistence operations for accounts.
//!
//! Email and nickname uniqueness is enforced by database constraints;
//! violations surface here as `Conflict` instead of being pre-checked.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::config::ROLE_USER;
use crate::domain::{Account, MemberSearchCriteria, UserType};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Account repository trait for dependency injection.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find account by nickname
    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<Account>>;

    /// Persist a new account with the default role
    async fn create(
        &self,
        email: String,
        nickname: String,
        password_hash: String,
        user_type: UserType,
    ) -> AppResult<Account>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account>;

    /// Replace the nickname
    async fn update_nickname(&self, id: Uuid, nickname: String) -> AppResult<Account>;

    /// Store a fresh email verification token
    async fn set_verification_token(&self, id: Uuid, token: String) -> AppResult<Account>;

    /// Mark the email verification complete and consume the token
    async fn mark_verified(&self, id: Uuid) -> AppResult<Account>;

    /// Paginated member search for the admin surface.
    /// Returns the page of accounts plus the total match count.
    async fn search(
        &self,
        criteria: &MemberSearchCriteria,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)>;
}

/// SeaORM-backed implementation of `AccountRepository`.
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> AppResult<account::Model> {
        AccountEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(Account::from))
    }

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Nickname.eq(nickname))
            .one(&self.db)
            .await?;
        Ok(result.map(Account::from))
    }

    async fn create(
        &self,
        email: String,
        nickname: String,
        password_hash: String,
        user_type: UserType,
    ) -> AppResult<Account> {
        let model = new_account_model(email, nickname, password_hash, user_type)
            .insert(&self.db)
            .await
            .map_err(map_insert_err)?;
        Ok(Account::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Account::from(model))
    }

    async fn update_nickname(&self, id: Uuid, nickname: String) -> AppResult<Account> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.nickname = Set(nickname);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_insert_err)?;
        Ok(Account::from(model))
    }

    async fn set_verification_token(&self, id: Uuid, token: String) -> AppResult<Account> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.verification_token = Set(Some(token));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Account::from(model))
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<Account> {
        let mut active: ActiveModel = self.fetch(id).await?.into();
        active.email_verified = Set(true);
        active.verification_token = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Account::from(model))
    }

    async fn search(
        &self,
        criteria: &MemberSearchCriteria,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)> {
        let mut query = AccountEntity::find();

        if let Some(keyword) = &criteria.keyword {
            query = query.filter(
                Condition::any()
                    .add(account::Column::Email.contains(keyword))
                    .add(account::Column::Nickname.contains(keyword)),
            );
        }
        if let Some(role) = criteria.role {
            query = query.filter(account::Column::Role.eq(role.to_string()));
        }
        if let Some(user_type) = criteria.user_type {
            query = query.filter(account::Column::UserType.eq(user_type.to_string()));
        }
        if let Some(verified) = criteria.verified {
            query = query.filter(account::Column::EmailVerified.eq(verified));
        }

        let paginator = query
            .order_by_desc(account::Column::CreatedAt)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(Account::from).collect(), total))
    }
}

/// Build the active model for a brand new account.
/// Shared with the transaction-scoped repository.
pub(crate) fn new_account_model(
    email: String,
    nickname: String,
    password_hash: String,
    user_type: UserType,
) -> ActiveModel {
    let now = chrono::Utc::now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        nickname: Set(nickname),
        password_hash: Set(password_hash),
        role: Set(ROLE_USER.to_string()),
        user_type: Set(user_type.to_string()),
        verification_token: Set(None),
        email_verified: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Translate unique constraint violations into a client-facing conflict.
pub(crate) fn map_insert_err(e: sea_orm::DbErr) -> AppError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Account"),
        _ => AppError::from(e),
    }
}
