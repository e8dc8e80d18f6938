// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2 password hashing and verification.

use std::sync::OnceLock;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;

use super::AuthError;
use crate::storage::UserRecord;

fn salt() -> Result<SaltString, AuthError> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| AuthError::PasswordHash(format!("salt encoding failed: {e}")))
}

/// Hash a password into a PHC string with a random salt.
pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = salt()?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string.
///
/// An unparseable stored hash never matches.
pub fn verify(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Burn one verification against a fixed hash.
///
/// Called when no account matches the submitted email so an unknown
/// address costs the same as a wrong password.
pub fn verify_dummy(password: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    let dummy = DUMMY.get_or_init(|| hash("relational-auth-dummy-password").ok());
    if let Some(stored) = dummy {
        let _ = verify(password, stored);
    }
}

/// Check a login attempt against the record found for its email.
///
/// A missing record and a wrong password both yield `CredentialMismatch`
/// after one full hash verification, so neither outcome is observable.
pub fn verify_credentials(record: Option<UserRecord>, password: &str) -> Result<UserRecord, AuthError> {
    match record {
        Some(record) if verify(password, &record.password_hash) => Ok(record),
        Some(_) => Err(AuthError::CredentialMismatch),
        None => {
            verify_dummy(password);
            Err(AuthError::CredentialMismatch)
        }
    }
}
