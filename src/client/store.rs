// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-held token storage.

use std::sync::Mutex;

use crate::storage::{FileStorage, StorageResult};

/// Fixed key the raw token is stored under.
pub const TOKEN_KEY: &str = "jwt";

/// Persistent slot for the client's current token.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> StorageResult<Option<String>>;
    fn save(&self, token: &str) -> StorageResult<()>;
    /// Remove the token. Removing an absent token is not an error.
    fn remove(&self) -> StorageResult<()>;
}

/// Process-local store; forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A panic while holding the lock cannot leave a half-written String
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> StorageResult<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> StorageResult<()> {
        self.slot().take();
        Ok(())
    }
}

/// Store backed by a single file named [`TOKEN_KEY`] in the session directory.
pub struct FileSessionStore {
    storage: FileStorage,
}

impl FileSessionStore {
    pub fn new(storage: FileStorage) -> Self {
        Self { storage }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> StorageResult<Option<String>> {
        let path = self.storage.paths().session_entry(TOKEN_KEY);
        Ok(self
            .storage
            .read_text(path)?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    fn save(&self, token: &str) -> StorageResult<()> {
        let path = self.storage.paths().session_entry(TOKEN_KEY);
        self.storage.write_text(path, token)
    }

    fn remove(&self) -> StorageResult<()> {
        let path = self.storage.paths().session_entry(TOKEN_KEY);
        self.storage.delete_if_exists(path)?;
        Ok(())
    }
}
