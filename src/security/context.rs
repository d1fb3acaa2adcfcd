//! Request-scoped security context.
//!
//! The context is an explicit value object passed by reference through the
//! call chain, never a process-wide singleton. Cross-request persistence is
//! handled by the session store, which serializes the whole context.

use serde::{Deserialize, Serialize};

use super::principal::{AccountPrincipal, Authority};

/// Principal plus its derived authority set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    pub principal: AccountPrincipal,
    pub authorities: Vec<Authority>,
}

impl Authentication {
    pub fn new(principal: AccountPrincipal) -> Self {
        let authorities = principal.authorities();
        Self {
            principal,
            authorities,
        }
    }
}

/// Holder of the (optional) authentication for one request or session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    /// Create an empty, unauthenticated context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an authentication, replacing any previous one.
    pub fn set_authentication(&mut self, authentication: Authentication) {
        self.authentication = Some(authentication);
    }

    /// Drop the authentication (logout).
    pub fn clear(&mut self) {
        self.authentication = None;
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn principal(&self) -> Option<&AccountPrincipal> {
        self.authentication.as_ref().map(|a| &a.principal)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }

    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authentication
            .as_ref()
            .map(|a| a.authorities.contains(&authority))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserType};
    use uuid::Uuid;

    fn principal(role: Role) -> AccountPrincipal {
        AccountPrincipal {
            account_id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            nickname: "tester".to_string(),
            role,
            user_type: UserType::Buyer,
            email_verified: true,
        }
    }

    #[test]
    fn test_empty_context_is_unauthenticated() {
        let ctx = SecurityContext::new();
        assert!(!ctx.is_authenticated());
        assert!(ctx.principal().is_none());
        assert!(!ctx.has_authority(Authority::User));
    }

    #[test]
    fn test_set_and_clear_authentication() {
        let mut ctx = SecurityContext::new();
        ctx.set_authentication(Authentication::new(principal(Role::User)));

        assert!(ctx.is_authenticated());
        assert!(ctx.has_authority(Authority::User));
        assert!(!ctx.has_authority(Authority::Admin));

        ctx.clear();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_context_round_trips_through_json() {
        // The session store persists contexts as JSON
        let mut ctx = SecurityContext::new();
        ctx.set_authentication(Authentication::new(principal(Role::Admin)));

        let json = serde_json::to_string(&ctx).unwrap();
        let restored: SecurityContext = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ctx);
        assert!(restored.has_authority(Authority::Admin));
    }
}
