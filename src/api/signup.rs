// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration.
//!
//! [`register`] is shared by the signup endpoint and the startup admin seed.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::login::MALFORMED_BODY_MESSAGE,
    auth::{
        claims::{validate_email, validate_name},
        password, IdentityClaims, Role,
    },
    config::SeedAdmin,
    error::ApiError,
    models::{ApiResponse, SignupRequest},
    state::AppState,
    storage::{normalize_email, NewUser, StorageError, UserRecord, UserRepository},
};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;

pub const EMAIL_TAKEN_MESSAGE: &str = "This email address is already registered.";
const SIGNUP_ERROR_MESSAGE: &str = "Registration failed. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid registration: {0}")]
    Invalid(String),
    #[error("email address already registered")]
    EmailTaken,
    #[error("registration failed: {0}")]
    Internal(String),
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Invalid(reason) => ApiError::bad_request(format!("Invalid registration: {reason}.")),
            RegistrationError::EmailTaken => ApiError::conflict(EMAIL_TAKEN_MESSAGE),
            RegistrationError::Internal(detail) => {
                tracing::error!(error = %detail, "registration failed");
                ApiError::internal(SIGNUP_ERROR_MESSAGE)
            }
        }
    }
}

fn validate_password(password: &str) -> Result<(), String> {
    let chars = password.chars().count();
    if chars < MIN_PASSWORD_CHARS {
        return Err(format!("password must be at least {MIN_PASSWORD_CHARS} characters"));
    }
    if chars > MAX_PASSWORD_CHARS {
        return Err(format!("password must be at most {MAX_PASSWORD_CHARS} characters"));
    }
    Ok(())
}

/// Validate, hash and store a new account.
pub async fn register(
    users: &dyn UserRepository,
    request: SignupRequest,
    role: Role,
) -> Result<UserRecord, RegistrationError> {
    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);

    validate_name(&name).map_err(RegistrationError::Invalid)?;
    validate_email(&email).map_err(RegistrationError::Invalid)?;
    validate_password(&request.password).map_err(RegistrationError::Invalid)?;

    let existing = users
        .find_by_email(&email)
        .await
        .map_err(|e| RegistrationError::Internal(e.to_string()))?;
    if existing.is_some() {
        return Err(RegistrationError::EmailTaken);
    }

    let plain = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash(&plain))
        .await
        .map_err(|e| RegistrationError::Internal(e.to_string()))?
        .map_err(|e| RegistrationError::Internal(e.to_string()))?;

    let record = users
        .create(NewUser {
            name,
            email,
            role,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent signup for the same address
            StorageError::AlreadyExists(_) => RegistrationError::EmailTaken,
            other => RegistrationError::Internal(other.to_string()),
        })?;

    tracing::info!(user_id = %record.id, role = %record.role, "account registered");
    Ok(record)
}

/// Create the configured admin account unless its email is already taken.
///
/// Returns whether an account was created. An existing account is left
/// as it is, whatever its role.
pub async fn seed_admin(users: &dyn UserRepository, seed: &SeedAdmin) -> Result<bool, RegistrationError> {
    let request = SignupRequest {
        name: seed.name.clone(),
        email: seed.email.clone(),
        password: seed.password.clone(),
    };
    match register(users, request, Role::Admin).await {
        Ok(_) => Ok(true),
        Err(RegistrationError::EmailTaken) => {
            tracing::info!("seed admin already registered");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Create an account with role `USER`.
#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<IdentityClaims>),
        (status = 400, description = "Malformed or invalid request", body = ApiResponse<String>),
        (status = 409, description = "Email address already registered", body = ApiResponse<String>)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<IdentityClaims>>), ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "signup body rejected");
        ApiError::bad_request(MALFORMED_BODY_MESSAGE)
    })?;

    let record = register(state.users.as_ref(), request, Role::User).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record.profile(), "Registration complete.")),
    ))
}
