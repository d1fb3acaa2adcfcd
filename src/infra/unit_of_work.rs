//! Unit of Work - repository access and explicit transaction scopes.
//!
//! Transaction demarcation is explicit: multi-step flows run inside a
//! `transaction` closure that receives a [`TransactionContext`] handle,
//! and the transaction commits on success or rolls back on error.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, Set, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::account_repository::{map_insert_err, new_account_model};
use super::repositories::entities::account::{ActiveModel, Entity as AccountEntity};
use super::repositories::{AccountRepository, AccountStore};
use crate::domain::{Account, UserType};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: the transaction method is generic, so this trait is not directly
/// mockable. Tests mock at the repository level instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get the account repository
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    /// Execute a closure within an explicit transaction scope.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within one transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get an account repository bound to this transaction
    pub fn accounts(&self) -> TxAccountRepository<'_> {
        TxAccountRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    account_repo: Arc<AccountStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let account_repo = Arc::new(AccountStore::new(db.clone()));
        Self { db, account_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.account_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware account repository.
///
/// Borrows the transaction so repository operations cannot outlive it.
/// Only the operations the signup flow needs are exposed here.
pub struct TxAccountRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAccountRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a new account with the default role
    pub async fn insert(
        &self,
        email: String,
        nickname: String,
        password_hash: String,
        user_type: UserType,
    ) -> AppResult<Account> {
        let model = new_account_model(email, nickname, password_hash, user_type)
            .insert(self.txn)
            .await
            .map_err(map_insert_err)?;
        Ok(Account::from(model))
    }

    /// Store a verification token on an account inside the transaction
    pub async fn set_verification_token(&self, id: uuid::Uuid, token: String) -> AppResult<Account> {
        let account = AccountEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = account.into();
        active.verification_token = Set(Some(token));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
