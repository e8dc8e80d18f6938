// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the on-disk storage layout.

use std::path::{Path, PathBuf};

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    // ========== User Paths ==========

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a user record file.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Directory of email → user id index entries.
    pub fn email_index_dir(&self) -> PathBuf {
        self.root.join("email-index")
    }

    /// Path to the index entry for a hashed email.
    pub fn email_index(&self, email_digest: &str) -> PathBuf {
        self.email_index_dir().join(format!("{email_digest}.json"))
    }

    // ========== Client Session Paths ==========

    /// Directory holding client-side session state.
    pub fn session_dir(&self) -> PathBuf {
        self.root.join("session")
    }

    /// Path to a stored session value.
    pub fn session_entry(&self, key: &str) -> PathBuf {
        self.session_dir().join(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_paths() {
        let paths = StoragePaths::new("/tmp/test");
        assert_eq!(paths.users_dir(), PathBuf::from("/tmp/test/users"));
        assert_eq!(paths.user("u1"), PathBuf::from("/tmp/test/users/u1.json"));
        assert_eq!(
            paths.email_index("abc"),
            PathBuf::from("/tmp/test/email-index/abc.json")
        );
    }

    #[test]
    fn session_paths() {
        let paths = StoragePaths::new("/home/me/.relational");
        assert_eq!(
            paths.session_entry("jwt"),
            PathBuf::from("/home/me/.relational/session/jwt")
        );
    }
}
