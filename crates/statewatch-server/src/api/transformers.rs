// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Proxied transformer catalog.

use axum::Json;
use axum::extract::State;

use statewatch_orchestrator_sdk::TransformerInfo;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /transformers` — the named input-transformation functions the
/// orchestrator offers, as id/name pairs for the dashboard's selects.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TransformerInfo>>, ApiError> {
    let transformers = state
        .orchestrator
        .list_transformers()
        .await
        .map_err(|e| ApiError::from_sdk("Failed to fetch transformers", e))?;

    Ok(Json(transformers))
}
