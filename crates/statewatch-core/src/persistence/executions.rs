// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Read and aggregation operations over the executions table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{DurationStats, ExecutionFilter, ExecutionRecord, StatusCount};
use crate::error::Result;
use crate::models::{ExecutionSortKey, SortOrder};

const SELECT_COLUMNS: &str = "execution_id, state_machine_id, name, input, output, \
     status::TEXT AS status, start_time, end_time, current_state, error, \
     metadata, created_at, updated_at";

const FILTER_PREDICATE: &str = "($1::TEXT IS NULL OR state_machine_id = $1) \
     AND ($2::TEXT IS NULL OR status::TEXT = $2) \
     AND ($3::TEXT IS NULL OR name LIKE '%' || $3 || '%') \
     AND ($4::TIMESTAMPTZ IS NULL OR start_time >= $4) \
     AND ($5::TIMESTAMPTZ IS NULL OR start_time <= $5)";

/// Get the execution with the most recent start_time among all rows sharing
/// `execution_id`.
///
/// Execution ids recur across time partitions; this lookup deliberately
/// resolves to the newest partition and makes older same-id rows
/// unreachable by id alone.
pub async fn get_latest_execution(
    pool: &PgPool,
    execution_id: &str,
) -> Result<Option<ExecutionRecord>> {
    let record = sqlx::query_as::<_, ExecutionRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM executions
        WHERE execution_id = $1
        ORDER BY start_time DESC
        LIMIT 1
        "#
    ))
    .bind(execution_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// List executions matching a conjunctive filter, sorted by a closed set of
/// columns.
pub async fn list_executions(
    pool: &PgPool,
    filter: &ExecutionFilter,
    sort_by: ExecutionSortKey,
    order: SortOrder,
    limit: i64,
    offset: i64,
) -> Result<Vec<ExecutionRecord>> {
    let column = sort_by.column();
    let direction = order.as_sql();

    let records = sqlx::query_as::<_, ExecutionRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM executions
        WHERE {FILTER_PREDICATE}
        ORDER BY {column} {direction}
        LIMIT $6 OFFSET $7
        "#
    ))
    .bind(filter.state_machine_id.as_deref())
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.search.as_deref())
    .bind(filter.started_after)
    .bind(filter.started_before)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Count executions matching the same predicate as [`list_executions`],
/// without limit/offset.
pub async fn count_executions(pool: &PgPool, filter: &ExecutionFilter) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(&format!(
        r#"
        SELECT COUNT(*)
        FROM executions
        WHERE {FILTER_PREDICATE}
        "#
    ))
    .bind(filter.state_machine_id.as_deref())
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.search.as_deref())
    .bind(filter.started_after)
    .bind(filter.started_before)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

/// Group executions started at or after `since` by status.
///
/// Statuses with zero rows are omitted from the result.
pub async fn status_breakdown(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<StatusCount>> {
    let counts = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status::TEXT AS status, COUNT(*) AS count
        FROM executions
        WHERE start_time >= $1
        GROUP BY status
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

/// Most recent FAILED executions, newest first.
pub async fn recent_failures(pool: &PgPool, limit: i64) -> Result<Vec<ExecutionRecord>> {
    let records = sqlx::query_as::<_, ExecutionRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM executions
        WHERE status = 'FAILED'
        ORDER BY start_time DESC
        LIMIT $1
        "#
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Mean/min/max duration in seconds over executions with a recorded end
/// time, started at or after `since`. All fields are None when no execution
/// qualifies.
pub async fn duration_stats(pool: &PgPool, since: DateTime<Utc>) -> Result<DurationStats> {
    let stats = sqlx::query_as::<_, DurationStats>(
        r#"
        SELECT AVG(EXTRACT(EPOCH FROM (end_time - start_time)))::DOUBLE PRECISION AS avg_seconds,
               MIN(EXTRACT(EPOCH FROM (end_time - start_time)))::DOUBLE PRECISION AS min_seconds,
               MAX(EXTRACT(EPOCH FROM (end_time - start_time)))::DOUBLE PRECISION AS max_seconds
        FROM executions
        WHERE end_time IS NOT NULL
          AND start_time >= $1
        "#,
    )
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

/// Count all executions across every partition.
pub async fn count_all_executions(pool: &PgPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM executions")
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}
