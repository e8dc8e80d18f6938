// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoint.

use axum::Json;

use crate::{
    auth::{error::SESSION_INVALID_MESSAGE, IdentityClaims, OptionalAuth},
    models::ApiResponse,
};

/// Resolve the bearer token into the caller's current profile.
///
/// Always answers 200. An absent, invalid or expired token, or a token for
/// a user that no longer exists, yields `payload: null`.
#[utoipa::path(
    get,
    path = "/api/auth",
    tag = "Auth",
    security(("bearer" = []), ()),
    responses(
        (status = 200, description = "Resolved profile, or null when anonymous", body = ApiResponse<IdentityClaims>)
    )
)]
pub async fn session(OptionalAuth(user): OptionalAuth) -> Json<ApiResponse<IdentityClaims>> {
    match user {
        Some(user) => Json(ApiResponse::ok(user, "Fetched the session.")),
        None => Json(ApiResponse::failure(SESSION_INVALID_MESSAGE)),
    }
}
