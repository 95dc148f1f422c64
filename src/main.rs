// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, process::ExitCode};

use session_auth_server::{
    api::router,
    config::{SessionConfig, DEFAULT_HOST, DEFAULT_PORT, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV},
    state::AppState,
    telemetry::{self, LogFormat},
};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init(LogFormat::parse(env::var(LOG_FORMAT_ENV).ok().as_deref()));

    // Configuration problems are fatal: the process must not start serving.
    let config = match SessionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        environment = %config.environment,
        access_ttl_secs = state.policy().access_ttl().as_secs(),
        refresh_ttl_secs = state.policy().refresh_ttl().as_secs(),
        "Session policy loaded"
    );

    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = env::var(PORT_ENV)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, %host, port, "Failed to parse bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "Session auth server listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
