//! Account service - registration, credentials, sessions, member admin.
//!
//! Every operation delegates to the repository; the only state this
//! service ever mutates directly is the caller-provided security context.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Account, MemberSearchCriteria, Password, SignUpForm};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::security::{AccountPrincipal, Authentication, SecurityContext};
use crate::types::PaginationParams;
use crate::with_transaction;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Hash the form password and persist a new account with the default role.
    /// The form is assumed valid; handlers validate before calling.
    async fn register(&self, form: SignUpForm) -> AppResult<Account>;

    /// Generate an opaque single-use email verification token, persist it on
    /// the account, and return it. Never sends the email itself.
    async fn issue_verification(&self, account: &Account) -> AppResult<String>;

    /// Composite signup: register plus token issue inside one transaction
    /// scope. Returns the persisted account and its verification token.
    async fn process_signup(&self, form: SignUpForm) -> AppResult<(Account, String)>;

    /// Verify credentials for the login endpoint. The identifier may be an
    /// email address or a nickname.
    async fn authenticate(&self, identifier: &str, password: &str) -> AppResult<Account>;

    /// Look up the principal by email, falling back to nickname.
    async fn load_principal(&self, identifier: &str) -> AppResult<AccountPrincipal>;

    /// Install the account's principal and authorities into the passed
    /// security context. Side effect only.
    fn login(&self, account: &Account, ctx: &mut SecurityContext);

    /// Mark the account verified, consume the token, and re-establish the
    /// session so the authority set reflects the new state.
    async fn complete_registration(
        &self,
        account: &Account,
        ctx: &mut SecurityContext,
    ) -> AppResult<Account>;

    /// Re-hash and persist a new password.
    async fn change_password(&self, account: &Account, new_password: &str) -> AppResult<Account>;

    /// Persist a new nickname, then re-login so the session principal
    /// reflects it.
    async fn change_nickname(
        &self,
        account: &Account,
        nickname: &str,
        ctx: &mut SecurityContext,
    ) -> AppResult<Account>;

    /// Fetch an account by primary key.
    async fn get_account(&self, id: Uuid) -> AppResult<Account>;

    /// Admin member search: pure pass-through to the repository's
    /// paginated query.
    async fn search_members(
        &self,
        criteria: &MemberSearchCriteria,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn generate_verification_token() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn register(&self, form: SignUpForm) -> AppResult<Account> {
        let password_hash = Password::new(&form.password)?.into_string();

        // Uniqueness of email/nickname is the database's job; violations
        // come back as Conflict from the repository.
        self.uow
            .accounts()
            .create(form.email, form.nickname, password_hash, form.user_type)
            .await
    }

    async fn issue_verification(&self, account: &Account) -> AppResult<String> {
        let token = Self::generate_verification_token();
        self.uow
            .accounts()
            .set_verification_token(account.id, token.clone())
            .await?;

        tracing::debug!(account_id = %account.id, "Issued email verification token");
        Ok(token)
    }

    async fn process_signup(&self, form: SignUpForm) -> AppResult<(Account, String)> {
        let password_hash = Password::new(&form.password)?.into_string();
        let token = Self::generate_verification_token();

        with_transaction!(self.uow, |ctx| {
            let account = ctx
                .accounts()
                .insert(form.email, form.nickname, password_hash, form.user_type)
                .await?;
            let account = ctx
                .accounts()
                .set_verification_token(account.id, token.clone())
                .await?;
            Ok((account, token))
        })
    }

    async fn authenticate(&self, identifier: &str, password: &str) -> AppResult<Account> {
        let account = match self.uow.accounts().find_by_email(identifier).await? {
            Some(account) => Some(account),
            None => self.uow.accounts().find_by_nickname(identifier).await?,
        };

        // Verify against a dummy hash when the account is missing so a
        // lookup miss costs the same as a wrong password.
        let stored = match &account {
            Some(account) => Password::from_hash(account.password_hash.clone()),
            None => Password::from_hash(DUMMY_HASH.to_string()),
        };
        let password_valid = stored.verify(password);

        match account {
            Some(account) if password_valid => Ok(account),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn load_principal(&self, identifier: &str) -> AppResult<AccountPrincipal> {
        let account = match self.uow.accounts().find_by_email(identifier).await? {
            Some(account) => Some(account),
            None => self.uow.accounts().find_by_nickname(identifier).await?,
        };

        account
            .map(|account| AccountPrincipal::from(&account))
            .ok_or_else(|| AppError::PrincipalNotFound(identifier.to_string()))
    }

    fn login(&self, account: &Account, ctx: &mut SecurityContext) {
        let principal = AccountPrincipal::from(account);
        tracing::debug!(account_id = %principal.account_id, "Establishing session");
        ctx.set_authentication(Authentication::new(principal));
    }

    async fn complete_registration(
        &self,
        account: &Account,
        ctx: &mut SecurityContext,
    ) -> AppResult<Account> {
        let updated = self.uow.accounts().mark_verified(account.id).await?;
        self.login(&updated, ctx);
        Ok(updated)
    }

    async fn change_password(&self, account: &Account, new_password: &str) -> AppResult<Account> {
        let password_hash = Password::new(new_password)?.into_string();
        self.uow
            .accounts()
            .update_password(account.id, password_hash)
            .await
    }

    async fn change_nickname(
        &self,
        account: &Account,
        nickname: &str,
        ctx: &mut SecurityContext,
    ) -> AppResult<Account> {
        let updated = self
            .uow
            .accounts()
            .update_nickname(account.id, nickname.to_string())
            .await?;
        self.login(&updated, ctx);
        Ok(updated)
    }

    async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn search_members(
        &self,
        criteria: &MemberSearchCriteria,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)> {
        self.uow.accounts().search(criteria, params).await
    }
}

/// Well-formed Argon2id hash with no matching account; used to keep
/// authentication constant-work when the identifier misses.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$VE0e3g7DalWHgDwou3nuRA$uC6TER156UQpk0lNp5r2dmfdLRrgHlNwFA+aTsrPRbA";
