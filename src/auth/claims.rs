// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity claims and their on-token representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AuthError, Role};

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 32;

/// Longest accepted email address, in bytes.
pub const MAX_EMAIL_LEN: usize = 254;

/// The identity a token attests to.
///
/// This is the primary type used throughout the application to represent
/// who is making a request. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityClaims {
    /// Canonical user ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (normalized)
    pub email: String,
    /// User's role
    pub role: Role,
}

impl IdentityClaims {
    /// Check the claim set against the identity schema.
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_name(&self.name).map_err(AuthError::InvalidClaims)?;
        validate_email(&self.email).map_err(AuthError::InvalidClaims)?;
        Ok(())
    }

    /// Check if the user has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }
}

/// Full token payload: the identity plus its validity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: IdentityClaims,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name must not be blank".to_string());
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(format!("name exceeds {MAX_NAME_CHARS} characters"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("email exceeds {MAX_EMAIL_LEN} bytes"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err("email must not contain whitespace".to_string());
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err("email must contain '@'".to_string());
    };
    if local.is_empty() || local.contains('@') {
        return Err("email local part is invalid".to_string());
    }
    let dotted: Vec<&str> = domain.split('.').collect();
    if dotted.len() < 2 || dotted.iter().any(|label| label.is_empty()) {
        return Err("email domain is invalid".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> IdentityClaims {
        IdentityClaims {
            id: Uuid::parse_str("6f1c1d64-2b8e-4c1e-9a53-3f4a2b9d7e10").unwrap(),
            name: "Alice".to_string(),
            email: "a@example.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn valid_claims_pass() {
        assert!(sample_claims().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut claims = sample_claims();
        claims.name = "   ".to_string();
        assert!(matches!(claims.validate(), Err(AuthError::InvalidClaims(_))));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut claims = sample_claims();
        claims.name = "x".repeat(MAX_NAME_CHARS + 1);
        assert!(matches!(claims.validate(), Err(AuthError::InvalidClaims(_))));
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@example.com").is_ok());
        assert!(validate_email("first.last@mail.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a@example..com").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn token_claims_flatten_identity() {
        let claims = TokenClaims {
            identity: sample_claims(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["email"], "a@example.com");
        assert_eq!(value["role"], "USER");
        assert_eq!(value["exp"], 1_700_003_600);
    }

    #[test]
    fn unknown_role_does_not_deserialize() {
        let raw = serde_json::json!({
            "id": "6f1c1d64-2b8e-4c1e-9a53-3f4a2b9d7e10",
            "name": "Alice",
            "email": "a@example.com",
            "role": "ROOT",
        });
        assert!(serde_json::from_value::<IdentityClaims>(raw).is_err());
    }

    #[test]
    fn has_role_checks_privilege() {
        let mut claims = sample_claims();
        assert!(claims.has_role(Role::User));
        assert!(!claims.has_role(Role::Admin));
        claims.role = Role::Admin;
        assert!(claims.has_role(Role::Admin));
        assert!(claims.has_role(Role::User));
    }
}
