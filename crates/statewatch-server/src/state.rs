// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared request handler state.

use std::sync::Arc;

use sqlx::PgPool;
use statewatch_orchestrator_sdk::OrchestratorClient;

/// State injected into every handler: the pooled database connection and
/// the orchestrator forwarding client, both resolved once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool for the execution store.
    pub pool: PgPool,
    /// Client for the downstream orchestration service.
    pub orchestrator: Arc<OrchestratorClient>,
}

impl AppState {
    /// Create handler state from its two collaborators.
    pub fn new(pool: PgPool, orchestrator: Arc<OrchestratorClient>) -> Self {
        Self { pool, orchestrator }
    }
}
