// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session resolution: who is authenticated for this request.
//!
//! Every protected operation goes through [`SessionResolver`]; nothing else
//! checks signatures. Failures degrade to [`Session::Anonymous`] and are
//! logged by kind, never propagated as request-fatal errors.
//!
//! ## Profile policy
//!
//! Store-confirming: after the token verifies, the user is re-read by ID.
//! A deleted user resolves to anonymous even while their token is still
//! valid, and name/role changes made since issuance are reflected
//! immediately.

use std::sync::Arc;

use super::{AuthError, IdentityClaims, TokenVerifier};
use crate::storage::UserRepository;

/// Outcome of resolving a request's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated(IdentityClaims),
    Anonymous,
}

impl Session {
    pub fn into_identity(self) -> Option<IdentityClaims> {
        match self {
            Session::Authenticated(claims) => Some(claims),
            Session::Anonymous => None,
        }
    }
}

/// Resolves raw bearer tokens into sessions.
#[derive(Clone)]
pub struct SessionResolver {
    verifier: TokenVerifier,
    users: Arc<dyn UserRepository>,
}

impl SessionResolver {
    pub fn new(verifier: TokenVerifier, users: Arc<dyn UserRepository>) -> Self {
        Self { verifier, users }
    }

    /// Resolve a request's token. Never fails; problems yield `Anonymous`.
    pub async fn resolve(&self, raw_token: Option<&str>) -> Session {
        match self.authenticate(raw_token).await {
            Ok(claims) => Session::Authenticated(claims),
            Err(err) => {
                log_rejection(&err);
                Session::Anonymous
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but keeps the failure kind, for
    /// callers that must choose a status code. Does not log.
    pub async fn authenticate(&self, raw_token: Option<&str>) -> Result<IdentityClaims, AuthError> {
        let raw = raw_token.ok_or(AuthError::MissingToken)?;
        let claims = self.verifier.verify(raw)?;

        match self.users.find_by_id(claims.id).await {
            Ok(Some(record)) => Ok(record.profile()),
            Ok(None) => Err(AuthError::ProfileNotFound),
            Err(e) => Err(AuthError::Store(e.to_string())),
        }
    }
}

/// Log why a request was treated as anonymous.
pub(crate) fn log_rejection(err: &AuthError) {
    let reason = err.error_code();
    if err.is_verification_failure() {
        match err {
            AuthError::MissingToken => tracing::debug!(reason, "no session token presented"),
            AuthError::InvalidSignature => tracing::warn!(reason, "session token rejected"),
            AuthError::Expired => tracing::info!(reason, "session token rejected"),
            _ => tracing::debug!(reason, error = %err, "session token rejected"),
        }
        return;
    }

    match err {
        AuthError::ProfileNotFound => {
            tracing::info!(reason, "session token names a user that no longer exists")
        }
        AuthError::Store(detail) => {
            tracing::error!(reason, error = %detail, "user lookup failed during session resolution")
        }
        _ => tracing::warn!(reason, error = %err, "unexpected failure during session resolution"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{sample_claims, SECRET};
    use crate::auth::{ManualClock, Role, SigningKeys, TokenIssuer};
    use crate::storage::{InMemoryUserRepository, NewUser, StorageError, StorageResult, UserRecord};
    use async_trait::async_trait;
    use uuid::Uuid;

    const T0: i64 = 1_700_000_000;

    struct Fixture {
        clock: ManualClock,
        issuer: TokenIssuer,
        resolver: SessionResolver,
        users: Arc<InMemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::at(T0);
        let keys = Arc::new(SigningKeys::from_secret(SECRET).unwrap());
        let users = Arc::new(InMemoryUserRepository::new());
        let verifier = TokenVerifier::new(keys.clone(), Arc::new(clock.clone()));
        Fixture {
            issuer: TokenIssuer::new(keys, Arc::new(clock.clone())),
            resolver: SessionResolver::new(verifier, users.clone()),
            clock,
            users,
        }
    }

    async fn seed(users: &InMemoryUserRepository) -> IdentityClaims {
        users
            .create(NewUser {
                name: "Alice".to_string(),
                email: "a@example.com".to_string(),
                role: Role::User,
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap()
            .profile()
    }

    #[tokio::test]
    async fn absent_token_is_anonymous() {
        let f = fixture();
        assert_eq!(f.resolver.resolve(None).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn valid_token_for_existing_user_authenticates() {
        let f = fixture();
        let profile = seed(&f.users).await;
        let token = f.issuer.issue(&profile, 3600).unwrap().token;

        let session = f.resolver.resolve(Some(&token)).await;
        assert_eq!(session, Session::Authenticated(profile));
    }

    #[tokio::test]
    async fn expired_token_is_anonymous() {
        let f = fixture();
        let profile = seed(&f.users).await;
        let token = f.issuer.issue(&profile, 60).unwrap().token;

        f.clock.advance(61);
        assert_eq!(f.resolver.resolve(Some(&token)).await, Session::Anonymous);
        assert_eq!(
            f.resolver.authenticate(Some(&token)).await,
            Err(AuthError::Expired)
        );
    }

    #[tokio::test]
    async fn garbage_token_is_anonymous() {
        let f = fixture();
        assert_eq!(f.resolver.resolve(Some("garbage")).await, Session::Anonymous);
        assert_eq!(f.resolver.resolve(Some("")).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn deleted_user_is_anonymous_despite_valid_token() {
        let f = fixture();
        let profile = seed(&f.users).await;
        let token = f.issuer.issue(&profile, 3600).unwrap().token;
        f.users.delete(profile.id).await.unwrap();

        assert_eq!(
            f.resolver.authenticate(Some(&token)).await,
            Err(AuthError::ProfileNotFound)
        );
        assert_eq!(f.resolver.resolve(Some(&token)).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn unknown_user_in_signed_token_is_anonymous() {
        let f = fixture();
        let token = f.issuer.issue(&sample_claims(), 3600).unwrap().token;
        assert_eq!(f.resolver.resolve(Some(&token)).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn resolution_reflects_current_profile() {
        let f = fixture();
        let profile = seed(&f.users).await;
        let mut stale = profile.clone();
        stale.name = "Old Name".to_string();
        let token = f.issuer.issue(&stale, 3600).unwrap().token;

        let session = f.resolver.resolve(Some(&token)).await;
        assert_eq!(session.into_identity().map(|c| c.name), Some("Alice".to_string()));
    }

    struct FailingRepository;

    #[async_trait]
    impl crate::storage::UserRepository for FailingRepository {
        async fn find_by_email(&self, _: &str) -> StorageResult<Option<UserRecord>> {
            Err(StorageError::NotFound("disk".into()))
        }
        async fn find_by_id(&self, _: Uuid) -> StorageResult<Option<UserRecord>> {
            Err(StorageError::Io(std::io::Error::other("disk unavailable")))
        }
        async fn create(&self, _: NewUser) -> StorageResult<UserRecord> {
            Err(StorageError::Io(std::io::Error::other("disk unavailable")))
        }
        async fn delete(&self, _: Uuid) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("disk unavailable")))
        }
        async fn list(&self) -> StorageResult<Vec<UserRecord>> {
            Err(StorageError::Io(std::io::Error::other("disk unavailable")))
        }
    }

    #[tokio::test]
    async fn store_failure_is_anonymous() {
        let f = fixture();
        let keys = Arc::new(SigningKeys::from_secret(SECRET).unwrap());
        let resolver = SessionResolver::new(
            TokenVerifier::new(keys, Arc::new(f.clock.clone())),
            Arc::new(FailingRepository),
        );
        let token = f.issuer.issue(&sample_claims(), 3600).unwrap().token;

        assert!(matches!(
            resolver.authenticate(Some(&token)).await,
            Err(AuthError::Store(_))
        ));
        assert_eq!(resolver.resolve(Some(&token)).await, Session::Anonymous);
    }
}
