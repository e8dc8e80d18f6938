// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.

use std::sync::Arc;

use jsonwebtoken::{encode, Header};

use super::clock::SharedClock;
use super::keys::{SigningKeys, TOKEN_ALGORITHM};
use super::{AuthError, IdentityClaims, TokenClaims};

/// A freshly signed token and its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS string handed to the client
    pub token: String,
    /// Issued at (unix seconds)
    pub issued_at: i64,
    /// Expiration (unix seconds)
    pub expires_at: i64,
}

/// Signs identity claims into time-bounded tokens.
///
/// Issuance is pure computation over the keys and the clock. Nothing is
/// recorded, so a token cannot be revoked before it expires.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<SigningKeys>,
    clock: SharedClock,
}

impl TokenIssuer {
    pub fn new(keys: Arc<SigningKeys>, clock: SharedClock) -> Self {
        Self { keys, clock }
    }

    /// Issue a token for `claims` valid for `ttl_seconds` from now.
    pub fn issue(&self, claims: &IdentityClaims, ttl_seconds: i64) -> Result<IssuedToken, AuthError> {
        if ttl_seconds <= 0 {
            return Err(AuthError::InvalidLifetime(ttl_seconds));
        }
        claims.validate()?;

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add(ttl_seconds)
            .ok_or(AuthError::InvalidLifetime(ttl_seconds))?;

        let payload = TokenClaims {
            identity: claims.clone(),
            iat: issued_at,
            exp: expires_at,
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &payload, self.keys.encoding())
            .map_err(|e| AuthError::SigningError(e.to_string()))?;

        tracing::debug!(
            user_id = %claims.id,
            expires_at,
            key = self.keys.fingerprint(),
            "issued session token"
        );

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{sample_claims, SECRET};
    use crate::auth::ManualClock;

    fn issuer_at(now: i64) -> TokenIssuer {
        let keys = Arc::new(SigningKeys::from_secret(SECRET).unwrap());
        TokenIssuer::new(keys, Arc::new(ManualClock::at(now)))
    }

    #[test]
    fn issue_sets_window_from_clock() {
        let issued = issuer_at(1_700_000_000).issue(&sample_claims(), 3600).unwrap();
        assert_eq!(issued.issued_at, 1_700_000_000);
        assert_eq!(issued.expires_at, 1_700_003_600);
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let issuer = issuer_at(1_700_000_000);
        assert_eq!(
            issuer.issue(&sample_claims(), 0),
            Err(AuthError::InvalidLifetime(0))
        );
        assert_eq!(
            issuer.issue(&sample_claims(), -5),
            Err(AuthError::InvalidLifetime(-5))
        );
    }

    #[test]
    fn invalid_claims_are_rejected() {
        let mut claims = sample_claims();
        claims.email = "not-an-email".to_string();
        assert!(matches!(
            issuer_at(1_700_000_000).issue(&claims, 60),
            Err(AuthError::InvalidClaims(_))
        ));
    }

    #[test]
    fn overflowing_ttl_is_rejected() {
        let issuer = issuer_at(i64::MAX - 10);
        assert_eq!(
            issuer.issue(&sample_claims(), 60),
            Err(AuthError::InvalidLifetime(60))
        );
    }

    #[test]
    fn header_names_hs256() {
        let issued = issuer_at(1_700_000_000).issue(&sample_claims(), 60).unwrap();
        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.alg, TOKEN_ALGORITHM);
    }
}
