// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless session authentication with HS256-signed tokens.
//!
//! ## Auth Flow
//!
//! 1. Client posts email + password to `/api/login`
//! 2. Server checks the Argon2 hash and issues a signed token carrying
//!    `{ id, name, email, role, iat, exp }`
//! 3. Client stores the token and sends `Authorization: Bearer <token>`
//! 4. Server:
//!    - Verifies signature, then expiry, then claim schema
//!    - Re-reads the user by ID (store-confirming)
//!    - Treats any failure as "not logged in"
//!
//! ## Security
//!
//! - There is no server-side session state; the token is the session
//! - Tokens cannot be revoked before expiry
//! - Rotating `JWT_SECRET` invalidates every outstanding token
//! - Unknown email and wrong password are indistinguishable to clients

pub mod claims;
pub mod clock;
pub mod error;
pub mod extractor;
pub mod issuer;
pub mod keys;
pub mod password;
pub mod resolver;
pub mod roles;
pub mod verifier;

pub use claims::{IdentityClaims, TokenClaims};
pub use clock::{system_clock, Clock, SharedClock, SystemClock};
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use error::AuthError;
pub use extractor::{bearer_token, AdminOnly, Auth, OptionalAuth};
pub use issuer::{IssuedToken, TokenIssuer};
pub use keys::SigningKeys;
pub use resolver::{Session, SessionResolver};
pub use roles::Role;
pub use verifier::{decode_unverified, RawPayload, TokenVerifier};
