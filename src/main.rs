// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use relational_auth_server::{
    api::{router, signup::seed_admin},
    auth::{system_clock, SigningKeys},
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{FileStorage, FileUserRepository, InMemoryUserRepository, StoragePaths, UserRepository},
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    // A weak or missing key stops startup
    let keys = SigningKeys::from_secret(config.jwt_secret.as_bytes()).inspect_err(|e| {
        tracing::error!(error = %e, "signing key rejected");
    })?;
    tracing::info!(key_fingerprint = keys.fingerprint(), ttl_seconds = config.token_ttl, "signing key loaded");

    let users: Arc<dyn UserRepository> = match &config.data_dir {
        Some(dir) => {
            let storage = FileStorage::open(StoragePaths::new(dir))?;
            tracing::info!(data_dir = %dir.display(), "using file user store");
            Arc::new(FileUserRepository::new(storage))
        }
        None => {
            tracing::warn!("DATA_DIR not set; users are kept in memory only");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    if let Some(seed) = &config.seed_admin {
        if seed_admin(users.as_ref(), seed).await? {
            tracing::info!("seed admin created");
        }
    }

    let state = AppState::new(keys, users, system_clock()).with_token_ttl(config.token_ttl);
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Relational Auth server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
