// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! State machine listing, detail, and forwarded creation.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use statewatch_core::models::{SortOrder, StateMachineSortKey};
use statewatch_core::persistence::{self, StateMachineRecord};
use statewatch_orchestrator_sdk::CreateStateMachineRequest;

use super::{Pagination, parse_enum, parse_page, parse_page_size};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachinesQuery {
    page: Option<String>,
    page_size: Option<String>,
    search: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachineList {
    data: Vec<StateMachineRecord>,
    pagination: Pagination,
}

/// `GET /state-machines` — paginated listing with name substring search.
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StateMachinesQuery>,
) -> Result<Json<StateMachineList>, ApiError> {
    let mut violations = Vec::new();
    let page = parse_page(query.page.as_deref(), &mut violations);
    let page_size = parse_page_size(query.page_size.as_deref(), 20, &mut violations);
    let sort_by: StateMachineSortKey = parse_enum(
        query.sort_by.as_deref(),
        "sortBy",
        "must be one of name, createdAt, updatedAt",
        &mut violations,
    )
    .unwrap_or_default();
    let order: SortOrder = parse_enum(
        query.order.as_deref(),
        "order",
        "must be asc or desc",
        &mut violations,
    )
    .unwrap_or_default();
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let search = query.search.as_deref().filter(|s| !s.is_empty());
    let pagination = Pagination::new(
        page,
        page_size,
        persistence::state_machines::count_state_machines(&state.pool, search).await?,
    );
    let data = persistence::state_machines::list_state_machines(
        &state.pool,
        search,
        sort_by,
        order,
        page_size,
        pagination.offset(),
    )
    .await?;

    Ok(Json(StateMachineList { data, pagination }))
}

/// `GET /state-machines/{id}` — detail with the stored definition parsed to
/// JSON for display. Parsing is best-effort: a definition that is not valid
/// JSON is returned as the raw string, never an error.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = persistence::state_machines::get_state_machine(&state.pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("State machine with ID \"{id}\" not found")))?;

    Ok(Json(with_parsed_definition(&record)?))
}

/// Render a machine with its stored definition text parsed to a structured
/// value; definitions that are not valid JSON stay as the raw string.
fn with_parsed_definition(record: &StateMachineRecord) -> Result<Value, ApiError> {
    let mut body = serde_json::to_value(record)
        .map_err(|e| ApiError::Internal(format!("failed to serialize state machine: {e}")))?;
    if let Ok(parsed) = serde_json::from_str::<Value>(&record.definition) {
        body["definition"] = parsed;
    }
    Ok(body)
}

/// `POST /state-machines` — validate and forward creation to the
/// orchestrator, which owns persistence. Answers 201 with the downstream
/// body on success.
#[instrument(skip(state, request), fields(id = %request.id))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateStateMachineRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let forwarded = state
        .orchestrator
        .create_state_machine(&request)
        .await
        .map_err(|e| {
            ApiError::from_sdk("Failed to create state machine in downstream service", e)
        })?;

    Ok((StatusCode::CREATED, Json(forwarded.body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record(definition: &str) -> StateMachineRecord {
        StateMachineRecord {
            id: "sm-1".to_string(),
            name: "order-pipeline".to_string(),
            description: None,
            definition: definition.to_string(),
            machine_type: Some("STANDARD".to_string()),
            version: "1.0".to_string(),
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_definition_parsed_structurally() {
        let definition = json!({"StartAt": "First", "States": {"First": {"Type": "Succeed"}}});
        let body = with_parsed_definition(&record(&definition.to_string())).unwrap();
        // Structurally equal to what was stored, not a string rendering.
        assert_eq!(body["definition"], definition);
        assert_eq!(body["id"], "sm-1");
    }

    #[test]
    fn test_invalid_definition_kept_as_raw_string() {
        let body = with_parsed_definition(&record("not json {")).unwrap();
        assert_eq!(body["definition"], "not json {");
    }
}
