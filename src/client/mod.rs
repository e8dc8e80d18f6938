// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Session
//!
//! The client half of the login flow: a [`SessionCache`] over a pluggable
//! [`SessionStore`], and an [`AuthClient`] that talks to the server.
//!
//! The cache decodes tokens locally to answer "am I still logged in?"
//! without a round trip. That answer is for display only. Anything that
//! needs authority goes through the server, which verifies the signature.

pub mod cache;
pub mod http;
pub mod store;

pub use cache::{SessionCache, SessionEvent, SessionState};
pub use http::AuthClient;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_KEY};

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server URL: {0}")]
    BaseUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server refused the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("token cannot be decoded")]
    InvalidToken,

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}
