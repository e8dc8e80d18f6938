// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request bodies and the response envelope shared by every endpoint.
//!
//! ## Envelope
//!
//! ```json
//! { "success": true, "payload": <T | null>, "message": "..." }
//! ```
//!
//! Failures always carry `payload: null` and a human-readable message that
//! is safe to show as-is.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Response Envelope
// =============================================================================

/// Response envelope used by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Result on success, `null` on failure.
    pub payload: Option<T>,
    /// Human-readable status message.
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(payload: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            message: message.into(),
        }
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Display name (1-32 characters).
    pub name: String,
    /// Email address; must not be registered yet.
    pub email: String,
    /// Password (8-128 characters).
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_null_payload() {
        let body = serde_json::to_value(ApiResponse::<String>::failure("nope")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "payload": null, "message": "nope" })
        );
    }

    #[test]
    fn ok_wraps_payload() {
        let response = ApiResponse::ok("token".to_string(), "");
        assert!(response.success);
        assert_eq!(response.payload.as_deref(), Some("token"));
    }
}
