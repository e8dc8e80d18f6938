// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the login and session endpoints.

use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::cache::{SessionCache, SessionState};
use super::ClientError;
use crate::auth::IdentityClaims;
use crate::models::{ApiResponse, LoginRequest};

#[derive(Clone)]
pub struct AuthClient {
    base: Url,
    client: reqwest::Client,
    cache: SessionCache,
}

impl AuthClient {
    pub fn new(base: &str, cache: SessionCache) -> Result<Self, ClientError> {
        let base = Url::parse(base).map_err(|e| ClientError::BaseUrl(e.to_string()))?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base, client, cache })
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(|e| ClientError::BaseUrl(e.to_string()))
    }

    /// Log in and keep the issued token.
    ///
    /// The token is stored only after the whole response has been received
    /// and decoded; a failed or abandoned login leaves storage untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<IdentityClaims, ClientError> {
        let response = self
            .client
            .post(self.endpoint("/api/login")?)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let token: String = read_envelope(response).await?;
        match self.cache.store(&token)? {
            SessionState::Valid(claims) => Ok(claims),
            _ => Err(ClientError::InvalidToken),
        }
    }

    /// Ask the server who the stored token belongs to.
    ///
    /// Returns `None` without a request when there is no valid local session.
    /// An anonymous answer from the server leaves local state as it is.
    pub async fn session(&self) -> Result<Option<IdentityClaims>, ClientError> {
        let Some(bearer) = self.cache.bearer()? else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.endpoint("/api/auth")?)
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;

        match read_envelope::<IdentityClaims>(response).await {
            Ok(claims) => Ok(Some(claims)),
            Err(ClientError::Rejected { message, .. }) => {
                tracing::debug!(%message, "server reported no session");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Local logout; the server holds no session to revoke.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.cache.clear()
    }
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let envelope: ApiResponse<T> = response.json().await?;
    match envelope {
        ApiResponse {
            success: true,
            payload: Some(payload),
            ..
        } => Ok(payload),
        ApiResponse { message, .. } => Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        }),
    }
}
