// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! Checks run in a fixed order so a forged but well-formed token is always
//! rejected for its signature, never for its contents:
//!
//! 1. presence (`MissingToken`)
//! 2. structure (`MalformedToken`)
//! 3. signature (`InvalidSignature`)
//! 4. expiry (`Expired`)
//! 5. claim schema (`InvalidClaims`)

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Validation};
use serde_json::{Map, Value};

use super::clock::SharedClock;
use super::keys::{SigningKeys, TOKEN_ALGORITHM};
use super::{AuthError, IdentityClaims};

/// Decoded claims segment with the validity window split off.
///
/// `iat` must be present but is otherwise ignored.
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub exp: i64,
    body: Map<String, Value>,
}

impl RawPayload {
    fn from_value(value: Value) -> Result<Self, AuthError> {
        let Value::Object(mut body) = value else {
            return Err(AuthError::MalformedToken);
        };
        take_timestamp(&mut body, "iat")?;
        let exp = take_timestamp(&mut body, "exp")?;
        Ok(Self { exp, body })
    }

    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Parse the remaining claims against the identity schema.
    pub fn into_identity(self) -> Result<IdentityClaims, AuthError> {
        let claims: IdentityClaims = serde_json::from_value(Value::Object(self.body))
            .map_err(|e| AuthError::InvalidClaims(e.to_string()))?;
        claims.validate()?;
        Ok(claims)
    }
}

fn take_timestamp(body: &mut Map<String, Value>, key: &str) -> Result<i64, AuthError> {
    body.remove(key)
        .and_then(|v| v.as_i64())
        .ok_or(AuthError::MalformedToken)
}

fn check_structure(token: &str) -> Result<(), AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(AuthError::MalformedToken);
    }
    Ok(())
}

/// Decode a token's claims WITHOUT checking its signature.
///
/// Claims are readable by anyone holding the token; only the signature is
/// secret-protected. The result is advisory and must never authorize
/// anything server-side.
pub fn decode_unverified(token: &str) -> Result<RawPayload, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    check_structure(token)?;

    let data = jsonwebtoken::dangerous::insecure_decode::<Value>(token)
        .map_err(|_| AuthError::MalformedToken)?;
    RawPayload::from_value(data.claims)
}

/// Verifies tokens issued under the server secret.
///
/// Verification is a pure function of the token, the secret and the clock;
/// identical inputs at the same instant always agree.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<SigningKeys>,
    clock: SharedClock,
}

impl TokenVerifier {
    pub fn new(keys: Arc<SigningKeys>, clock: SharedClock) -> Self {
        Self { keys, clock }
    }

    /// Verify `token` and return the identity it carries, unchanged.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        check_structure(token)?;
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(AuthError::InvalidSignature);
        }

        // Expiry and schema are checked below, after the signature.
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Value>(token, self.keys.decoding(), &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedToken,
            }
        })?;

        let payload = RawPayload::from_value(data.claims)?;
        if payload.is_expired_at(self.clock.now()) {
            return Err(AuthError::Expired);
        }

        payload.into_identity()
    }
}
