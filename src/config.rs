// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret (at least 32 bytes) | Required |
//! | `TOKEN_TTL_SECONDS` | Lifetime of login tokens, at most 30 days | `3600` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory for the file user store | In-memory store |
//! | `SEED_ADMIN_EMAIL` | Email of an admin account created at startup | None |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded admin | None |
//! | `SEED_ADMIN_NAME` | Display name for the seeded admin | `Administrator` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable holding the token signing secret.
///
/// The secret is read once; changing it requires a restart and invalidates
/// every token issued under the old value.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable for the login token lifetime in seconds.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECONDS";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable for the user store directory.
///
/// When unset, users are kept in memory and lost on restart.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const SEED_ADMIN_NAME_ENV: &str = "SEED_ADMIN_NAME";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default login token lifetime (1 hour).
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;
/// Longest accepted login token lifetime (30 days).
pub const MAX_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 3600;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors. Any of these stops the process before it serves.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Account created at startup if it does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl: i64,
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub seed_admin: Option<SeedAdmin>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let token_ttl = match get(TOKEN_TTL_ENV) {
            Some(raw) => parse_ttl(&raw)?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let seed_admin = match (get(SEED_ADMIN_EMAIL_ENV), get(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedAdmin {
                email,
                password,
                name: get(SEED_ADMIN_NAME_ENV).unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
            }),
            (Some(_), None) => return Err(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(SEED_ADMIN_EMAIL_ENV)),
            (None, None) => None,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };

        Ok(Self {
            jwt_secret,
            token_ttl,
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from),
            seed_admin,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_ttl(raw: &str) -> Result<i64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: TOKEN_TTL_ENV,
        value: raw.to_string(),
        reason,
    };
    let ttl: i64 = raw.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if ttl <= 0 {
        return Err(invalid("must be positive".to_string()));
    }
    if ttl > MAX_TOKEN_TTL_SECONDS {
        return Err(invalid(format!("must be at most {MAX_TOKEN_TTL_SECONDS} seconds")));
    }
    Ok(ttl)
}
