// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth - Stateless Session Authentication
//!
//! Issues HS256-signed session tokens at login, resolves them back into the
//! caller's current profile on every request, and provides the client-side
//! session cache that holds the token between requests.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification and session resolution
//! - `client` - Client session cache and HTTP client
//! - `storage` - User repositories (in-memory and file-backed)

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
