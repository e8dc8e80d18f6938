// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{normalize_email, NewUser, StorageError, StorageResult, UserRecord, UserRepository};

#[derive(Default)]
struct Users {
    by_id: HashMap<Uuid, UserRecord>,
    by_email: HashMap<String, Uuid>,
}

/// Process-local user repository. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<UserRecord>> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> StorageResult<UserRecord> {
        let record = UserRecord::new(new_user);
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&record.email) {
            return Err(StorageError::AlreadyExists(format!("User {}", record.email)));
        }
        users.by_email.insert(record.email.clone(), record.id);
        users.by_id.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let mut users = self.users.write().await;
        let record = users
            .by_id
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(format!("User {id}")))?;
        users.by_email.remove(&record.email);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<UserRecord>> {
        let mut records: Vec<UserRecord> = self.users.read().await.by_id.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}
