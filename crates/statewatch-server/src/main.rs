// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Statewatch - Monitoring Dashboard API Server
//!
//! An HTTP server responsible for:
//! - Read/aggregation queries over the execution store (state machines,
//!   executions, state history)
//! - Validating and forwarding create/launch requests to the downstream
//!   orchestration service
//! - Health reporting for this layer and the downstream service

use std::sync::Arc;

use tracing::{info, warn};

use statewatch_orchestrator_sdk::OrchestratorClient;
use statewatch_server::config::ServerConfig;
use statewatch_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statewatch_server=info,tower_http=info".into()),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    // Load configuration
    let config = ServerConfig::from_env()?;

    info!(bind_addr = %config.bind_addr, "Starting Statewatch");

    // Connect to database
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    info!("Connected to database");

    statewatch_core::migrations::run(&pool).await?;

    info!("Database schema up to date");

    // Orchestrator forwarding client, resolved once and injected
    let orchestrator = Arc::new(OrchestratorClient::from_env()?);
    info!(
        service_url = %orchestrator.config().base_url,
        "Orchestrator client ready"
    );

    let app = statewatch_server::router(AppState::new(pool, orchestrator));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Statewatch ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Statewatch shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
