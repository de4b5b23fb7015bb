// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Enriched execution timeline.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use statewatch_core::persistence;
use statewatch_core::timeline::{self, HistorySummary, TimelineEntry};
use statewatch_orchestrator_sdk::FieldViolation;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateHistoryQuery {
    execution_id: Option<String>,
    execution_start_time: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateHistoryResponse {
    execution_id: String,
    execution_start_time: Option<DateTime<Utc>>,
    total_states: usize,
    total_duration: Option<i64>,
    states: Vec<TimelineEntry>,
    summary: HistorySummary,
}

/// `GET /state-history?executionId&executionStartTime?` — the execution's
/// state transitions in sequence order, enriched with durations, previews,
/// and a status summary.
///
/// Without `executionStartTime` the rows of every partition sharing the id
/// are returned, tolerating callers that only know the id.
#[instrument(skip(state, query))]
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<StateHistoryQuery>,
) -> Result<Json<StateHistoryResponse>, ApiError> {
    let mut violations = Vec::new();
    let execution_id = match query.execution_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            violations.push(FieldViolation::new("executionId", "Execution ID is required"));
            String::new()
        }
    };
    let execution_start_time = match query.execution_start_time.as_deref() {
        None => None,
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                violations.push(FieldViolation::new(
                    "executionStartTime",
                    "must be an RFC 3339 timestamp",
                ));
                None
            }
        },
    };
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let states = persistence::state_history::list_state_history(
        &state.pool,
        &execution_id,
        execution_start_time,
    )
    .await?;
    if states.is_empty() {
        return Err(ApiError::NotFound(
            "No state history found for this execution".to_string(),
        ));
    }

    let summary = timeline::summarize(&states);
    let total_duration = timeline::total_duration_ms(&states);
    let states = timeline::enrich(states);

    Ok(Json(StateHistoryResponse {
        execution_id,
        execution_start_time,
        total_states: states.len(),
        total_duration,
        states,
        summary,
    }))
}
