// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::{AdminOnly, Auth, IdentityClaims},
    error::ApiError,
    models::ApiResponse,
    state::AppState,
};

/// Get the current authenticated user's profile.
///
/// The profile is re-read from the user store, so a rename or role change
/// shows up here before the token expires.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<IdentityClaims>),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ApiResponse<String>),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<ApiResponse<IdentityClaims>> {
    Json(ApiResponse::ok(user, "Fetched the user profile."))
}

/// List every registered account. Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All profiles, oldest first", body = ApiResponse<Vec<IdentityClaims>>),
        (status = 401, description = "Not authenticated", body = ApiResponse<String>),
        (status = 403, description = "Not authorized (admin required)", body = ApiResponse<String>)
    )
)]
pub async fn list_users(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<IdentityClaims>>>, ApiError> {
    let records = state.users.list().await.map_err(|e| {
        tracing::error!(error = %e, "failed to list users");
        ApiError::internal("Failed to list users.")
    })?;

    tracing::info!(admin_id = %admin.id, count = records.len(), "admin listed users");

    let profiles = records.iter().map(|r| r.profile()).collect();
    Ok(Json(ApiResponse::ok(profiles, "Fetched all users.")))
}
