// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material derived from the server secret.
//!
//! ## Security
//!
//! - One symmetric secret signs and verifies every token (HS256)
//! - Keys are built once at startup and shared read-only
//! - Rotating the secret invalidates all outstanding tokens
//! - The secret itself is never logged; use [`SigningKeys::fingerprint`]

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use sha2::{Digest, Sha256};

use super::AuthError;

/// Algorithm used for every token this service issues or accepts.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Shortest accepted secret. HS256 keys below the hash output size are weak.
pub const MIN_SECRET_LEN: usize = 32;

/// Encoding and decoding keys for the configured secret.
#[derive(Clone)]
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    fingerprint: String,
}

impl SigningKeys {
    /// Build keys from the raw secret.
    ///
    /// Fails with `SigningError` when the secret is empty or shorter than
    /// [`MIN_SECRET_LEN`] bytes. This is a configuration fault: the caller
    /// should refuse to serve rather than retry.
    pub fn from_secret(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::SigningError("signing secret is empty".to_string()));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::SigningError(format!(
                "signing secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            fingerprint: fingerprint(secret),
        })
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }

    /// Short SHA-256 prefix identifying the secret in logs.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeys")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

fn fingerprint(secret: &[u8]) -> String {
    Sha256::digest(secret)
        .iter()
        .take(6)
        .map(|b| format!("{b:02x}"))
        .collect()
}
