// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Liveness of this layer and of the downstream orchestrator.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use statewatch_orchestrator_sdk::SdkError;

use crate::state::AppState;

/// `GET /health` — liveness of this layer.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "statewatch",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /service-health` — liveness of the downstream orchestrator.
///
/// Always answers HTTP 200 with an internal `status: UP|DOWN` field so
/// infrastructure health checks watching this endpoint do not flap on
/// transient downstream outages.
pub async fn service_health(State(state): State<AppState>) -> Json<Value> {
    let timestamp = Utc::now().to_rfc3339();

    match state.orchestrator.health().await {
        Ok(forwarded) => Json(json!({
            "status": "UP",
            "statusCode": forwarded.status,
            "data": forwarded.body,
            "timestamp": timestamp,
        })),
        Err(SdkError::Upstream { status, body }) => Json(json!({
            "status": "DOWN",
            "statusCode": status,
            "message": format!("Service returned {status}: {body}"),
            "timestamp": timestamp,
        })),
        Err(err) => Json(json!({
            "status": "DOWN",
            "statusCode": null,
            "message": err.to_string(),
            "timestamp": timestamp,
        })),
    }
}
