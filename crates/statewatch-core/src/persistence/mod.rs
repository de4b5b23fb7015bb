// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Persistence operations for statewatch-core.
//!
//! Read-only access to the execution store. Every function is a single
//! statement over a pooled connection; no transactions or locking are
//! needed because this layer never performs conditional updates.
//!
//! Optional filters use the `$n::TYPE IS NULL OR ...` bind pattern so one
//! prepared statement covers all filter combinations; ORDER BY columns come
//! from the closed enumerations in [`crate::models`], never from raw user
//! strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::ExecutionStatus;

pub mod executions;
pub mod state_history;
pub mod state_machines;

/// State machine row.
///
/// `definition` is stored as text and treated as an opaque document; the API
/// layer parses it to JSON best-effort for display only.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachineRecord {
    /// User-assigned unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Opaque state machine definition document.
    pub definition: String,
    /// Free-form type tag (e.g. "STANDARD").
    #[serde(rename = "type")]
    pub machine_type: Option<String>,
    /// Free-form version string.
    pub version: String,
    /// Key-value metadata document.
    pub metadata: Option<serde_json::Value>,
    /// When the machine was registered.
    pub created_at: DateTime<Utc>,
    /// When the machine was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Execution row.
///
/// Keyed by `(execution_id, start_time)`; the same execution id may recur
/// across time partitions.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Execution identifier (unique only together with `start_time`).
    pub execution_id: String,
    /// Owning state machine id.
    pub state_machine_id: String,
    /// Display name of this execution.
    pub name: String,
    /// Opaque input payload.
    pub input: Option<serde_json::Value>,
    /// Opaque output payload.
    pub output: Option<serde_json::Value>,
    /// Status as written by the orchestrator.
    pub status: String,
    /// Partition key and lifecycle start.
    pub start_time: DateTime<Utc>,
    /// Lifecycle end; NULL while running or when no end was recorded.
    pub end_time: Option<DateTime<Utc>>,
    /// Name of the state machine node currently/last active.
    pub current_state: String,
    /// Error text for failed executions.
    pub error: Option<String>,
    /// Metadata document; may carry correlationKey/correlationValue.
    pub metadata: Option<serde_json::Value>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Row update time.
    pub updated_at: DateTime<Utc>,
}

/// State history row. Append-only; one row per state transition.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateHistoryRecord {
    /// Entry identifier (unique together with `start_time`).
    pub id: String,
    /// Owning execution id.
    pub execution_id: String,
    /// Owning execution's start time (FK partition component).
    pub execution_start_time: DateTime<Utc>,
    /// Name of the state machine node.
    pub state_name: String,
    /// Free-form node type (Task/Choice/Parallel/Map/Wait/...).
    pub state_type: String,
    /// Opaque state input.
    pub input: Option<serde_json::Value>,
    /// Opaque state output.
    pub output: Option<serde_json::Value>,
    /// Per-state status.
    pub status: String,
    /// When this state started.
    pub start_time: DateTime<Utc>,
    /// When this state ended, if recorded.
    pub end_time: Option<DateTime<Utc>>,
    /// Error text for failed states.
    pub error: Option<String>,
    /// Retry attempts so far.
    pub retry_count: i32,
    /// Ordering key within one execution; ascending replay reconstructs the
    /// timeline.
    pub sequence_number: i32,
    /// Metadata document.
    pub metadata: Option<serde_json::Value>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// One status bucket of a breakdown aggregation. Statuses with zero rows are
/// omitted by the query; callers decide whether to zero-fill.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StatusCount {
    /// Execution status.
    pub status: String,
    /// Number of executions with that status in the window.
    pub count: i64,
}

/// Duration aggregates over completed executions, in seconds.
///
/// All three fields are NULL when no execution in the window has an end
/// time; the aggregation never divides by zero.
#[derive(Debug, Clone, Default, sqlx::FromRow, Serialize)]
pub struct DurationStats {
    /// Mean duration.
    #[serde(rename = "avg_duration")]
    pub avg_seconds: Option<f64>,
    /// Shortest duration.
    #[serde(rename = "min_duration")]
    pub min_seconds: Option<f64>,
    /// Longest duration.
    #[serde(rename = "max_duration")]
    pub max_seconds: Option<f64>,
}

/// Conjunctive (AND) filter over execution listings. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct ExecutionFilter {
    /// Exact match on owning state machine.
    pub state_machine_id: Option<String>,
    /// Exact match on status.
    pub status: Option<ExecutionStatus>,
    /// Substring match on execution name.
    pub search: Option<String>,
    /// Inclusive lower bound on start_time.
    pub started_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start_time.
    pub started_before: Option<DateTime<Utc>>,
}
