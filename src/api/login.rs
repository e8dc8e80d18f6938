// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::{claims::validate_email, password, AuthError},
    error::ApiError,
    models::{ApiResponse, LoginRequest},
    state::AppState,
    storage::normalize_email,
};

/// Shared by unknown-email and wrong-password failures.
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect email address or password.";
pub const MALFORMED_BODY_MESSAGE: &str = "The request body is malformed.";
const LOGIN_ERROR_MESSAGE: &str = "Login failed. Please try again later.";

/// Exchange email and password for a signed session token.
///
/// The payload is the raw token string; clients send it back as
/// `Authorization: Bearer <token>`.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<String>),
        (status = 400, description = "Malformed request body", body = ApiResponse<String>),
        (status = 401, description = "Incorrect email address or password", body = ApiResponse<String>),
        (status = 500, description = "User store or signing failure", body = ApiResponse<String>)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "login body rejected");
        ApiError::bad_request(MALFORMED_BODY_MESSAGE)
    })?;

    let email = normalize_email(&request.email);
    if request.password.is_empty() || validate_email(&email).is_err() {
        return Err(ApiError::bad_request(MALFORMED_BODY_MESSAGE));
    }

    let record = state.users.find_by_email(&email).await.map_err(|e| {
        tracing::error!(error = %e, "user lookup failed during login");
        ApiError::internal(LOGIN_ERROR_MESSAGE)
    })?;

    // Argon2 is CPU-bound; keep it off the async workers
    let password = request.password;
    let outcome = tokio::task::spawn_blocking(move || password::verify_credentials(record, &password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "credential check task failed");
            ApiError::internal(LOGIN_ERROR_MESSAGE)
        })?;

    let record = match outcome {
        Ok(record) => record,
        Err(err) => {
            tracing::info!(reason = err.error_code(), "login refused");
            return Err(ApiError::unauthorized(LOGIN_FAILED_MESSAGE));
        }
    };

    let issued = state
        .issuer
        .issue(&record.profile(), state.token_ttl)
        .map_err(|err: AuthError| {
            tracing::error!(user_id = %record.id, reason = err.error_code(), error = %err, "token issuance failed");
            ApiError::internal(LOGIN_ERROR_MESSAGE)
        })?;

    tracing::info!(user_id = %record.id, expires_at = issued.expires_at, "login succeeded");

    Ok(Json(ApiResponse::ok(issued.token, "Logged in.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::auth::{testing::SECRET, Role, SigningKeys, TokenVerifier};
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn correct_credentials_issue_a_verifiable_token() {
        let app = TestApp::new();
        let record = app.add_user("Carol", "carol@example.com", Role::User).await;

        let (status, body) = app
            .send(post_json(
                "/api/login",
                json!({ "email": "carol@example.com", "password": PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let token = body["payload"].as_str().unwrap();
        let verifier = TokenVerifier::new(
            Arc::new(SigningKeys::from_secret(SECRET).unwrap()),
            Arc::new(app.clock.clone()),
        );
        let claims = verifier.verify(token).unwrap();
        assert_eq!(claims, record.profile());
    }

    #[tokio::test]
    async fn email_lookup_is_normalized() {
        let app = TestApp::new();
        app.add_user("Carol", "carol@example.com", Role::User).await;

        let (status, _) = app
            .send(post_json(
                "/api/login",
                json!({ "email": "  Carol@Example.COM ", "password": PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let app = TestApp::new();
        app.add_user("Dave", "dave@example.com", Role::User).await;

        let (wrong_status, wrong_body) = app
            .send(post_json(
                "/api/login",
                json!({ "email": "dave@example.com", "password": "not-the-password" }),
            ))
            .await;
        let (unknown_status, unknown_body) = app
            .send(post_json(
                "/api/login",
                json!({ "email": "nobody@example.com", "password": "not-the-password" }),
            ))
            .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(wrong_body["message"], LOGIN_FAILED_MESSAGE);
        assert_eq!(wrong_body["payload"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let app = TestApp::new();

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = app.send(not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], MALFORMED_BODY_MESSAGE);

        let (status, _) = app
            .send(post_json("/api/login", json!({ "email": "x@example.com" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(post_json(
                "/api/login",
                json!({ "email": "not-an-email", "password": "whatever" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
