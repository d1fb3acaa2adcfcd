//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER, USER_TYPE_BUYER, USER_TYPE_SELLER};

/// Account roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => Role::Admin,
            _ => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "{}", ROLE_ADMIN),
            Role::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// Account type chosen at signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Buyer,
    Seller,
}

impl From<&str> for UserType {
    fn from(s: &str) -> Self {
        match s {
            USER_TYPE_SELLER => UserType::Seller,
            _ => UserType::Buyer,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Buyer => write!(f, "{}", USER_TYPE_BUYER),
            UserType::Seller => write!(f, "{}", USER_TYPE_SELLER),
        }
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub user_type: UserType,
    /// Opaque single-use email verification token, cleared on completion
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check if account has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check a presented verification token against the stored one.
    /// A consumed (cleared) token never matches.
    pub fn verification_token_matches(&self, token: &str) -> bool {
        self.verification_token
            .as_deref()
            .map(|stored| stored == token)
            .unwrap_or(false)
    }
}

/// Sign-up form carried from the HTTP layer.
/// Field validation happens in the handler; the service assumes valid input.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub user_type: UserType,
}

/// Admin member search criteria
#[derive(Debug, Clone, Default)]
pub struct MemberSearchCriteria {
    /// Substring match against email or nickname
    pub keyword: Option<String>,
    pub role: Option<Role>,
    pub user_type: Option<UserType>,
    pub verified: Option<bool>,
}

/// Account response (safe to return to clients)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    /// Unique account identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Account email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Display nickname
    #[schema(example = "gopang_user")]
    pub nickname: String,
    /// Account role
    pub role: Role,
    /// Buyer or seller
    pub user_type: UserType,
    /// Whether the email verification flow completed
    pub email_verified: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            nickname: account.nickname,
            role: account.role,
            user_type: account.user_type,
            email_verified: account.email_verified,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("user"), Role::User);
        // Unknown values default to User
        assert_eq!(Role::from("something"), Role::User);
    }

    #[test]
    fn test_verification_token_match() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            nickname: "tester".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            user_type: UserType::Buyer,
            verification_token: Some("tok-123".to_string()),
            email_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(account.verification_token_matches("tok-123"));
        assert!(!account.verification_token_matches("tok-999"));
    }

    #[test]
    fn test_consumed_token_never_matches() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            nickname: "tester".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            user_type: UserType::Buyer,
            verification_token: None,
            email_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(!account.verification_token_matches("tok-123"));
    }
}
