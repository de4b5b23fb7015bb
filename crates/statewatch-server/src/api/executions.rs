// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Execution listing, single lookup, composite-key resolution, and
//! forwarded launches.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use statewatch_core::models::{DateRange, ExecutionSortKey, ExecutionStatus, SortOrder};
use statewatch_core::persistence::{self, ExecutionFilter, ExecutionRecord};
use statewatch_orchestrator_sdk::{FieldViolation, LaunchBatchRequest, LaunchExecutionRequest};

use super::{Pagination, parse_enum, parse_page, parse_page_size};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionsQuery {
    page: Option<String>,
    page_size: Option<String>,
    state_machine_id: Option<String>,
    status: Option<String>,
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    date_range: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    execution_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    state_machine_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ExecutionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_range: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionList {
    results: Vec<ExecutionRecord>,
    pagination: Pagination,
    filters: AppliedFilters,
}

fn parse_timestamp(
    raw: Option<&str>,
    field: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => {
            violations.push(FieldViolation::new(field, "must be an RFC 3339 timestamp"));
            None
        }
    }
}

/// `GET /executions` — filtered, paginated listing.
///
/// With `?executionId=` this short-circuits to the single-execution lookup
/// (most recent partition wins), answering the bare record or 404.
///
/// The time window is either a named `dateRange` or explicit
/// `startDate`/`endDate` bounds; a named range takes precedence and the
/// explicit dates are ignored. With neither, no time restriction applies.
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ExecutionsQuery>,
) -> Result<Response, ApiError> {
    if let Some(execution_id) = query.execution_id.as_deref().filter(|id| !id.is_empty()) {
        debug!(execution_id, "Single execution lookup");
        let record = lookup_latest(&state, execution_id).await?;
        return Ok(Json(record).into_response());
    }

    let mut violations = Vec::new();
    let page = parse_page(query.page.as_deref(), &mut violations);
    let page_size = parse_page_size(query.page_size.as_deref(), 25, &mut violations);
    let status: Option<ExecutionStatus> = parse_enum(
        query.status.as_deref(),
        "status",
        "must be a valid execution status",
        &mut violations,
    );
    let date_range: Option<DateRange> = parse_enum(
        query.date_range.as_deref(),
        "dateRange",
        "must be one of today, 7d, 30d, 90d",
        &mut violations,
    );
    let sort_by: ExecutionSortKey = parse_enum(
        query.sort_by.as_deref(),
        "sortBy",
        "must be one of startTime, endTime, status",
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

    let (started_after, started_before) = match date_range {
        Some(range) => (Some(range.cutoff(Utc::now())), None),
        None => (
            parse_timestamp(query.start_date.as_deref(), "startDate", &mut violations),
            parse_timestamp(query.end_date.as_deref(), "endDate", &mut violations),
        ),
    };
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let filter = ExecutionFilter {
        state_machine_id: query.state_machine_id.clone().filter(|s| !s.is_empty()),
        status,
        search: query.search.clone().filter(|s| !s.is_empty()),
        started_after,
        started_before,
    };

    let pagination = Pagination::new(
        page,
        page_size,
        persistence::executions::count_executions(&state.pool, &filter).await?,
    );
    let results = persistence::executions::list_executions(
        &state.pool,
        &filter,
        sort_by,
        order,
        page_size,
        pagination.offset(),
    )
    .await?;

    Ok(Json(ExecutionList {
        results,
        pagination,
        filters: AppliedFilters {
            state_machine_id: filter.state_machine_id,
            status,
            date_range: date_range.map(|r| r.as_str()),
        },
    })
    .into_response())
}

/// `GET /executions/{executionId}` — single lookup with the same
/// most-recent-partition contract as `?executionId=`.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(execution_id): Path<String>,
) -> Result<Json<ExecutionRecord>, ApiError> {
    let record = lookup_latest(&state, &execution_id).await?;
    Ok(Json(record))
}

/// `GET /executions/{executionId}/start-time` — resolve the execution's
/// composite-key start time from its earliest-sequence history row.
#[instrument(skip(state))]
pub async fn start_time(
    State(state): State<AppState>,
    Path(execution_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let resolved =
        persistence::state_history::earliest_execution_start_time(&state.pool, &execution_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound("No state history found for this execution".to_string())
            })?;

    Ok(Json(json!({ "executionStartTime": resolved })))
}

/// `POST /executions/launch` — validate and forward a single launch.
/// Answers 201 with the downstream body on success.
#[instrument(skip(state, request), fields(state_machine_id = %request.state_machine_id))]
pub async fn launch(
    State(state): State<AppState>,
    Json(request): Json<LaunchExecutionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let forwarded = state
        .orchestrator
        .launch_execution(&request)
        .await
        .map_err(|e| ApiError::from_sdk("Failed to launch execution in downstream service", e))?;

    Ok((StatusCode::CREATED, Json(forwarded.body)))
}

/// `POST /executions/launch-batch` — validate and forward a batch launch.
#[instrument(skip(state, request), fields(state_machine_id = %request.state_machine_id))]
pub async fn launch_batch(
    State(state): State<AppState>,
    Json(request): Json<LaunchBatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let forwarded = state.orchestrator.launch_batch(&request).await.map_err(|e| {
        ApiError::from_sdk("Failed to launch batch execution in downstream service", e)
    })?;

    Ok((StatusCode::CREATED, Json(forwarded.body)))
}

/// Resolve an execution id to the row with the most recent start time.
/// Older partitions sharing the id are unreachable by id alone.
async fn lookup_latest(state: &AppState, execution_id: &str) -> Result<ExecutionRecord, ApiError> {
    persistence::executions::get_latest_execution(&state.pool, execution_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Execution with ID \"{execution_id}\" not found"))
        })
}
