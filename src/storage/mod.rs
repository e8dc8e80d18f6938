// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Storage Module
//!
//! Credential records live behind the [`UserRepository`] trait. The auth
//! subsystem reads them during login and session resolution; signup is the
//! only writer.
//!
//! Two implementations ship:
//!
//! - [`FileUserRepository`] - JSON files under `DATA_DIR`
//! - [`InMemoryUserRepository`] - process-local, used in tests and when no
//!   data directory is configured
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/
//!     {user_id}.json           # UserRecord
//!   email-index/
//!     {sha256(email)}.json     # { "user_id": ... }
//!   session/
//!     jwt                      # client-side token (client data dirs only)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::auth::{IdentityClaims, Role};

pub mod fs;
pub mod memory;
pub mod paths;
pub mod users;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use memory::InMemoryUserRepository;
pub use paths::StoragePaths;
pub use users::FileUserRepository;

/// Stored credential record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    /// Normalized email (see [`normalize_email`])
    pub email: String,
    pub role: Role,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a record for a new account.
    pub fn new(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: normalize_email(&new_user.email),
            role: new_user.role,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        }
    }

    /// The identity claims for this account.
    pub fn profile(&self) -> IdentityClaims {
        IdentityClaims {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

/// Persistence collaborator for credential records.
///
/// Lookups may block on I/O. Implementations own their concurrency
/// discipline; callers share one instance across requests.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email. The email is normalized before matching.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<UserRecord>>;

    /// Create a user. Fails with `AlreadyExists` if the email is taken.
    async fn create(&self, new_user: NewUser) -> StorageResult<UserRecord>;

    /// Delete a user. Fails with `NotFound` if absent.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// List all users (admin view).
    async fn list(&self) -> StorageResult<Vec<UserRecord>>;
}

/// Canonical form of an email for storage and lookup: trimmed, NFKC,
/// lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Hex SHA-256 of the normalized email, used as an index file name.
pub fn email_digest(email: &str) -> String {
    Sha256::digest(normalize_email(email).as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
