// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;

/// Message returned for every rejected session, whatever the reason.
pub const SESSION_INVALID_MESSAGE: &str = "Authentication is invalid. Please log in again.";

/// Authentication error type.
///
/// Verification failures (`MissingToken` through `InvalidClaims`) are
/// logged by kind and never shown to clients verbatim; the HTTP rendering
/// always uses a generic message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No token supplied
    #[error("token is missing")]
    MissingToken,
    /// Token does not have the expected structure
    #[error("token is malformed")]
    MalformedToken,
    /// Signature does not verify under the server secret
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Token lifetime has elapsed
    #[error("token has expired")]
    Expired,
    /// Embedded claims violate the identity claim schema
    #[error("invalid identity claims: {0}")]
    InvalidClaims(String),
    /// Requested token lifetime is not positive
    #[error("token lifetime must be positive, got {0}s")]
    InvalidLifetime(i64),
    /// Signing secret is absent or unusable
    #[error("signing failed: {0}")]
    SigningError(String),
    /// Wrong email or password
    #[error("credentials do not match")]
    CredentialMismatch,
    /// Token was valid but names a user that no longer exists
    #[error("user profile not found")]
    ProfileNotFound,
    /// Caller lacks the role required by the operation
    #[error("insufficient permissions for this operation")]
    InsufficientPermissions,
    /// User repository failed
    #[error("user store error: {0}")]
    Store(String),
    /// Password hashing or salt generation failed
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// Stable identifier used in structured logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::InvalidLifetime(_) => "invalid_lifetime",
            AuthError::SigningError(_) => "signing_error",
            AuthError::CredentialMismatch => "credential_mismatch",
            AuthError::ProfileNotFound => "profile_not_found",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Store(_) => "store_error",
            AuthError::PasswordHash(_) => "password_hash_error",
        }
    }

    /// Whether this error comes out of token verification.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::InvalidClaims(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::InvalidClaims(_)
            | AuthError::CredentialMismatch
            | AuthError::ProfileNotFound => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InvalidLifetime(_)
            | AuthError::SigningError(_)
            | AuthError::Store(_)
            | AuthError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::FORBIDDEN => "You do not have permission to perform this operation.",
            StatusCode::UNAUTHORIZED => SESSION_INVALID_MESSAGE,
            _ => "Authentication could not be processed.",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ApiResponse::<()>::failure(self.public_message()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn expired_returns_401_with_generic_message() {
        let response = AuthError::Expired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["payload"].is_null());
        assert_eq!(body["message"], SESSION_INVALID_MESSAGE);
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn store_error_does_not_leak_detail() {
        let response = AuthError::Store("disk on fire at /data/users".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(!body.contains("/data/users"));
    }

    #[tokio::test]
    async fn password_hash_failure_is_internal_and_distinct_from_store() {
        let err = AuthError::PasswordHash("invalid salt".into());
        assert_eq!(err.error_code(), "password_hash_error");
        assert_ne!(err.error_code(), AuthError::Store(String::new()).error_code());
        assert!(!err.is_verification_failure());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(!body.contains("invalid salt"));
    }

    #[test]
    fn verification_failures_are_classified() {
        assert!(AuthError::InvalidSignature.is_verification_failure());
        assert!(AuthError::InvalidClaims("x".into()).is_verification_failure());
        assert!(!AuthError::ProfileNotFound.is_verification_failure());
        assert!(!AuthError::SigningError("x".into()).is_verification_failure());
    }
}
