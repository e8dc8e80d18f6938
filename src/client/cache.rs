// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side session state.
//!
//! ```text
//! NoSession --store--> Valid --(clock passes exp)--> Expired --(cleared)--> NoSession
//! Valid --clear--> NoSession
//! ```
//!
//! `Expired` is observed, never stored: the first `current()` that notices
//! it removes the token, so the following call reports `NoSession`.
//!
//! Everything here is advisory. Claims are decoded without the secret and
//! the expiry check trusts the local clock; only the server's resolver can
//! authorize anything.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::store::SessionStore;
use super::ClientError;
use crate::auth::{decode_unverified, IdentityClaims, SharedClock};

/// Capacity of the session event channel.
pub const EVENT_CAPACITY: usize = 16;

/// Locally observed session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Valid(IdentityClaims),
    Expired,
}

impl SessionState {
    pub fn claims(&self) -> Option<&IdentityClaims> {
        match self {
            SessionState::Valid(claims) => Some(claims),
            _ => None,
        }
    }
}

/// Change notifications for listeners that render session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Stored(IdentityClaims),
    Cleared,
    Expired,
}

#[derive(Clone)]
pub struct SessionCache {
    store: Arc<dyn SessionStore>,
    clock: SharedClock,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionCache {
    pub fn new(store: Arc<dyn SessionStore>, clock: SharedClock) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, clock, events }
    }

    /// Subscribe to session changes made through this cache or its clones.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Persist `token` and report the claims it carries.
    ///
    /// A token that cannot be decoded is refused and nothing is written.
    pub fn store(&self, token: &str) -> Result<SessionState, ClientError> {
        let payload = decode_unverified(token).map_err(|_| ClientError::InvalidToken)?;
        let expired = payload.is_expired_at(self.clock.now());
        let claims = payload.into_identity().map_err(|_| ClientError::InvalidToken)?;

        self.store.save(token.trim())?;
        tracing::debug!(user_id = %claims.id, "session token stored");

        if expired {
            // Surfaces as Expired on the next read
            return Ok(self.current()?);
        }
        self.publish(SessionEvent::Stored(claims.clone()));
        Ok(SessionState::Valid(claims))
    }

    /// Read the stored token and classify it against the local clock.
    pub fn current(&self) -> Result<SessionState, ClientError> {
        let Some(token) = self.store.load()? else {
            return Ok(SessionState::NoSession);
        };

        let payload = match decode_unverified(&token) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(reason = err.error_code(), "discarding undecodable session token");
                self.clear()?;
                return Ok(SessionState::NoSession);
            }
        };

        if payload.is_expired_at(self.clock.now()) {
            self.store.remove()?;
            tracing::info!(expired_at = payload.exp, "session token expired");
            self.publish(SessionEvent::Expired);
            return Ok(SessionState::Expired);
        }

        match payload.into_identity() {
            Ok(claims) => Ok(SessionState::Valid(claims)),
            Err(err) => {
                tracing::warn!(reason = err.error_code(), "discarding session token with invalid claims");
                self.clear()?;
                Ok(SessionState::NoSession)
            }
        }
    }

    /// Forget the token. No server call is made.
    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove()?;
        self.publish(SessionEvent::Cleared);
        Ok(())
    }

    /// `Authorization` header value, only while the session is `Valid`.
    pub fn bearer(&self) -> Result<Option<String>, ClientError> {
        if let SessionState::NoSession | SessionState::Expired = self.current()? {
            return Ok(None);
        }
        Ok(self.store.load()?.map(|token| format!("Bearer {token}")))
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
