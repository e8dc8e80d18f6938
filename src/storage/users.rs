// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed user repository.
//!
//! Each user is stored as a separate JSON file under `users/`. Email lookups
//! go through `email-index/`, keyed by the SHA-256 of the normalized email
//! so addresses never appear in file names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    email_digest, FileStorage, NewUser, StorageError, StorageResult, UserRecord, UserRepository,
};

#[derive(Debug, Serialize, Deserialize)]
struct EmailIndexEntry {
    user_id: Uuid,
}

/// Repository for user records on the filesystem.
pub struct FileUserRepository {
    storage: FileStorage,
    /// Serializes creates and deletes so the email index stays consistent.
    write_lock: Mutex<()>,
}

impl FileUserRepository {
    pub fn new(storage: FileStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn read_user(&self, id: Uuid) -> StorageResult<Option<UserRecord>> {
        match self.storage.read_json(self.storage.paths().user(&id.to_string())) {
            Ok(record) => Ok(Some(record)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_index(&self, email: &str) -> StorageResult<Option<Uuid>> {
        let index_path = self.storage.paths().email_index(&email_digest(email));
        match self.storage.read_json::<EmailIndexEntry>(index_path) {
            Ok(entry) => Ok(Some(entry.user_id)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The record an email resolves to.
    ///
    /// A record is live only while the index names it; an index entry
    /// without a user file, or a user file the index does not name, is
    /// leftover from an interrupted write and counts as absent.
    fn live_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        match self.read_index(email)? {
            Some(id) => self.read_user(id),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        self.live_by_email(email)
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<UserRecord>> {
        let Some(record) = self.read_user(id)? else {
            return Ok(None);
        };
        if self.read_index(&record.email)? != Some(id) {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn create(&self, new_user: NewUser) -> StorageResult<UserRecord> {
        let record = UserRecord::new(new_user);
        let user_path = self.storage.paths().user(&record.id.to_string());
        let index_path = self.storage.paths().email_index(&email_digest(&record.email));

        let _guard = self.write_lock.lock().await;
        if self.live_by_email(&record.email)?.is_some() {
            return Err(StorageError::AlreadyExists(format!("User {}", record.email)));
        }

        // The index write publishes the record
        self.storage.write_json(&user_path, &record)?;
        let indexed = self.storage.write_json(
            index_path,
            &EmailIndexEntry {
                user_id: record.id,
            },
        );
        if let Err(e) = indexed {
            if let Err(cleanup) = self.storage.delete_if_exists(&user_path) {
                tracing::warn!(user_id = %record.id, error = %cleanup, "failed to remove unindexed user record");
            }
            return Err(e);
        }

        tracing::info!(user_id = %record.id, "user record created");
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("User {id}")))?;

        // Unpublish first; a leftover user file is invisible without its index
        self.storage
            .delete(self.storage.paths().email_index(&email_digest(&record.email)))?;
        if let Err(e) = self.storage.delete(self.storage.paths().user(&id.to_string())) {
            tracing::warn!(user_id = %id, error = %e, "user unindexed but record file remains");
        }

        tracing::info!(user_id = %id, "user record deleted");
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<UserRecord>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut records = Vec::new();
        for id in ids {
            let Ok(id) = Uuid::parse_str(&id) else {
                tracing::warn!(file = %id, "skipping non-uuid user file");
                continue;
            };
            match self.find_by_id(id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => tracing::debug!(user_id = %id, "skipping unindexed user file"),
                Err(e) => tracing::warn!(user_id = %id, error = %e, "failed to read user record"),
            }
        }
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}
