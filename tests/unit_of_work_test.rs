//! Unit of Work tests against a mock database connection.
//!
//! The signup flow is the one multi-step write in the service; these tests
//! drive it through `Persistence` so the transaction scope itself is
//! exercised, not just the repository trait.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use uuid::Uuid;

use gopang::domain::{SignUpForm, UserType};
use gopang::errors::AppError;
use gopang::infra::repositories::entities::account;
use gopang::infra::Persistence;
use gopang::services::{AccountManager, AccountService};

fn account_row(id: Uuid, token: Option<&str>) -> account::Model {
    account::Model {
        id,
        email: "new@example.com".to_string(),
        nickname: "newbie".to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role: "user".to_string(),
        user_type: "buyer".to_string(),
        verification_token: token.map(|t| t.to_string()),
        email_verified: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn signup_form() -> SignUpForm {
    SignUpForm {
        email: "new@example.com".to_string(),
        nickname: "newbie".to_string(),
        password: "password123".to_string(),
        user_type: UserType::Buyer,
    }
}

#[tokio::test]
async fn test_process_signup_commits_account_and_token_in_one_transaction() {
    let id = Uuid::new_v4();

    // Result sets in execution order: the insert returning the new row,
    // the lookup inside the transaction, and the token update returning
    // the final row.
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![account_row(id, None)],
            vec![account_row(id, None)],
            vec![account_row(id, Some("persisted-token"))],
        ])
        .into_connection();

    let service = AccountManager::new(Arc::new(Persistence::new(conn.clone())));
    let (account, token) = service.process_signup(signup_form()).await.unwrap();

    assert_eq!(account.id, id);
    assert_eq!(account.email, "new@example.com");
    assert_eq!(account.verification_token.as_deref(), Some("persisted-token"));
    assert!(!token.is_empty());

    // Both writes ran inside a single transaction scope
    let log = conn.into_transaction_log();
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn test_process_signup_rolls_back_on_insert_failure() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("insert rejected".to_string())])
        .into_connection();

    let service = AccountManager::new(Arc::new(Persistence::new(conn)));
    let result = service.process_signup(signup_form()).await;

    assert!(matches!(result.unwrap_err(), AppError::Database(_)));
}
