//! Authenticated principal and authority types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Account, Role, UserType};

/// Permission token attached to a principal, derived from the account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    User,
    Admin,
}

/// The authenticated identity used by the security layer.
///
/// Derived view over an [`Account`]; never carries the password hash and
/// is not persisted on its own (it lives in the session store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPrincipal {
    pub account_id: Uuid,
    pub email: String,
    pub nickname: String,
    pub role: Role,
    pub user_type: UserType,
    pub email_verified: bool,
}

impl AccountPrincipal {
    /// Derive the authority set from the principal's role.
    /// Admins carry the user authority as well.
    pub fn authorities(&self) -> Vec<Authority> {
        match self.role {
            Role::Admin => vec![Authority::User, Authority::Admin],
            Role::User => vec![Authority::User],
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Account> for AccountPrincipal {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            nickname: account.nickname.clone(),
            role: account.role,
            user_type: account.user_type,
            email_verified: account.email_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(role: Role) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            nickname: "tester".to_string(),
            password_hash: "hash".to_string(),
            role,
            user_type: UserType::Buyer,
            verification_token: None,
            email_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_authorities() {
        let principal = AccountPrincipal::from(&account(Role::User));
        assert_eq!(principal.authorities(), vec![Authority::User]);
    }

    #[test]
    fn test_admin_authorities_include_user() {
        let principal = AccountPrincipal::from(&account(Role::Admin));
        assert_eq!(
            principal.authorities(),
            vec![Authority::User, Authority::Admin]
        );
    }

    #[test]
    fn test_principal_drops_password_hash() {
        // Serialized principal must never contain the stored hash
        let principal = AccountPrincipal::from(&account(Role::User));
        let json = serde_json::to_string(&principal).unwrap();
        assert!(!json.contains("hash"));
    }
}
