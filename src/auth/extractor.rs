// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is IdentityClaims
//! }
//! ```
//!
//! All extractors delegate to [`SessionResolver`](super::SessionResolver);
//! none of them look at token contents directly.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::resolver::log_rejection;
use super::{AuthError, IdentityClaims, Role};
use crate::state::AppState;

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
///
/// Returns `None` only when the header is absent. The scheme matches
/// case-insensitively and a bare `Bearer` yields an empty token, which
/// resolves as missing. A header with another scheme is passed through
/// whole so the verifier rejects it as malformed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?;
    let value = value.to_str().unwrap_or_default().trim();
    let (scheme, credential) = value.split_once(' ').unwrap_or((value, ""));
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(credential.trim())
    } else {
        Some(value)
    }
}

/// Extractor for authenticated users.
///
/// Rejects with 401 (or 500 if the user store is down) using the generic
/// envelope; the specific reason only goes to the log.
pub struct Auth(pub IdentityClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved earlier in this request
        if let Some(user) = parts.extensions.get::<IdentityClaims>().cloned() {
            return Ok(Auth(user));
        }

        match state.resolver.authenticate(bearer_token(&parts.headers)).await {
            Ok(user) => {
                parts.extensions.insert(user.clone());
                Ok(Auth(user))
            }
            Err(err) => {
                log_rejection(&err);
                Err(err)
            }
        }
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub IdentityClaims);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.has_role(Role::Admin) {
            tracing::warn!(user_id = %user.id, role = %user.role, "admin-only route refused");
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Optional authentication extractor.
///
/// Yields `None` when the request is anonymous instead of rejecting.
pub struct OptionalAuth(pub Option<IdentityClaims>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<IdentityClaims>().cloned() {
            return Ok(OptionalAuth(Some(user)));
        }

        let session = state.resolver.resolve(bearer_token(&parts.headers)).await;
        Ok(OptionalAuth(session.into_identity()))
    }
}
