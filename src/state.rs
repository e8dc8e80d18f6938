// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{SessionResolver, SharedClock, SigningKeys, TokenIssuer, TokenVerifier};
use crate::config::DEFAULT_TOKEN_TTL_SECONDS;
use crate::storage::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub issuer: TokenIssuer,
    pub resolver: SessionResolver,
    /// Lifetime of tokens issued at login, in seconds.
    pub token_ttl: i64,
}

impl AppState {
    pub fn new(keys: SigningKeys, users: Arc<dyn UserRepository>, clock: SharedClock) -> Self {
        let keys = Arc::new(keys);
        let verifier = TokenVerifier::new(keys.clone(), clock.clone());
        Self {
            issuer: TokenIssuer::new(keys, clock),
            resolver: SessionResolver::new(verifier, users.clone()),
            users,
            token_ttl: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: i64) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}
