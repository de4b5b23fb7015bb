// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dashboard aggregates with partial-failure tolerance.

use axum::Json;
use axum::extract::State;
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::warn;

use statewatch_core::models::ExecutionStatus;
use statewatch_core::persistence::{self, DurationStats, ExecutionRecord};

use crate::state::AppState;

/// How far back the status breakdown looks.
const BREAKDOWN_WINDOW_DAYS: i64 = 30;
/// How far back duration statistics look.
const DURATION_WINDOW_DAYS: i64 = 7;
/// How many recent failures to surface.
const RECENT_FAILURES_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct StatusBucket {
    status: &'static str,
    count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    status_counts: Vec<StatusBucket>,
    duration_stats: DurationStats,
    total_executions: i64,
    total_state_machines: i64,
    recent_failures: Vec<ExecutionRecord>,
    timestamp: String,
}

/// `GET /dashboard/stats` — aggregate counts, 30-day status breakdown,
/// 7-day duration stats, and recent failures.
///
/// Sub-queries are fetched independently and each degrades to an
/// empty/zero value on failure: for a monitoring dashboard partial data
/// beats no data, so this endpoint answers 200 even when the store is
/// down entirely.
pub async fn stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let now = Utc::now();

    let (total_executions, total_state_machines, breakdown, duration_stats, recent_failures) = tokio::join!(
        persistence::executions::count_all_executions(&state.pool),
        persistence::state_machines::count_all_state_machines(&state.pool),
        persistence::executions::status_breakdown(
            &state.pool,
            now - Duration::days(BREAKDOWN_WINDOW_DAYS),
        ),
        persistence::executions::duration_stats(
            &state.pool,
            now - Duration::days(DURATION_WINDOW_DAYS),
        ),
        persistence::executions::recent_failures(&state.pool, RECENT_FAILURES_LIMIT),
    );

    let total_executions = total_executions.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to count executions");
        0
    });
    let total_state_machines = total_state_machines.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to count state machines");
        0
    });
    let breakdown = breakdown.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to fetch status breakdown");
        Vec::new()
    });
    let duration_stats = duration_stats.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to fetch duration stats");
        DurationStats::default()
    });
    let recent_failures = recent_failures.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to fetch recent failures");
        Vec::new()
    });

    // Zero-fill every status so the dashboard's breakdown widget keeps a
    // stable shape as counts come and go.
    let status_counts = ExecutionStatus::ALL
        .iter()
        .map(|status| StatusBucket {
            status: status.as_str(),
            count: breakdown
                .iter()
                .find(|bucket| bucket.status == status.as_str())
                .map_or(0, |bucket| bucket.count),
        })
        .collect();

    Json(DashboardStats {
        status_counts,
        duration_stats,
        total_executions,
        total_state_machines,
        recent_failures,
        timestamp: now.to_rfc3339(),
    })
}
