// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Read operations over the state_history table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::StateHistoryRecord;
use crate::error::Result;

/// List state history entries for an execution, ordered by sequence number
/// ascending.
///
/// When `execution_start_time` is given the result is narrowed to exactly
/// that execution instance. When omitted, rows from every partition sharing
/// the id are returned, tolerating callers that only know the id.
pub async fn list_state_history(
    pool: &PgPool,
    execution_id: &str,
    execution_start_time: Option<DateTime<Utc>>,
) -> Result<Vec<StateHistoryRecord>> {
    let records = sqlx::query_as::<_, StateHistoryRecord>(
        r#"
        SELECT id, execution_id, execution_start_time, state_name, state_type,
               input, output, status::TEXT AS status, start_time, end_time,
               error, retry_count, sequence_number, metadata, created_at
        FROM state_history
        WHERE execution_id = $1
          AND ($2::TIMESTAMPTZ IS NULL OR execution_start_time = $2)
        ORDER BY sequence_number ASC
        "#,
    )
    .bind(execution_id)
    .bind(execution_start_time)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Resolve an execution's start time (the composite-key component) from its
/// earliest-sequence history row.
pub async fn earliest_execution_start_time(
    pool: &PgPool,
    execution_id: &str,
) -> Result<Option<DateTime<Utc>>> {
    let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
        r#"
        SELECT execution_start_time
        FROM state_history
        WHERE execution_id = $1
        ORDER BY sequence_number ASC
        LIMIT 1
        "#,
    )
    .bind(execution_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::migrations::POSTGRES.run(&pool).await.ok()?;
        Some(pool)
    }

    async fn insert_execution(
        pool: &PgPool,
        execution_id: &str,
        state_machine_id: &str,
        start_time: DateTime<Utc>,
    ) {
        sqlx::query(
            r#"
            INSERT INTO executions
                (execution_id, state_machine_id, name, status, start_time, current_state)
            VALUES ($1, $2, 'run', 'RUNNING'::execution_status, $3, 'First')
            "#,
        )
        .bind(execution_id)
        .bind(state_machine_id)
        .bind(start_time)
        .execute(pool)
        .await
        .expect("Failed to insert test execution");
    }

    async fn insert_history(
        pool: &PgPool,
        execution_id: &str,
        execution_start_time: DateTime<Utc>,
        sequence_number: i32,
        state_name: &str,
        status: &str,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) {
        sqlx::query(
            r#"
            INSERT INTO state_history
                (id, execution_id, execution_start_time, state_name, state_type,
                 status, start_time, end_time, sequence_number)
            VALUES ($1, $2, $3, $4, 'Task', $5::state_history_status, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(execution_id)
        .bind(execution_start_time)
        .bind(state_name)
        .bind(status)
        .bind(start_time)
        .bind(end_time)
        .bind(sequence_number)
        .execute(pool)
        .await
        .expect("Failed to insert test state history");
    }

    async fn cleanup_machine_executions(pool: &PgPool, state_machine_id: &str) {
        // History rows cascade via fk_execution.
        sqlx::query("DELETE FROM executions WHERE state_machine_id = $1")
            .bind(state_machine_id)
            .execute(pool)
            .await
            .ok();
    }

    #[tokio::test]
    async fn test_history_ordered_by_sequence() {
        let Some(pool) = test_pool().await else {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        };

        let sm = format!("sm-{}", Uuid::new_v4());
        let exec_id = format!("exec-{}", Uuid::new_v4());
        let start = Utc::now() - Duration::hours(1);
        insert_execution(&pool, &exec_id, &sm, start).await;

        // Inserted out of order on purpose.
        for seq in [2, 0, 1] {
            insert_history(
                &pool,
                &exec_id,
                start,
                seq,
                &format!("State{seq}"),
                "SUCCEEDED",
                start + Duration::seconds(i64::from(seq)),
                Some(start + Duration::seconds(i64::from(seq) + 1)),
            )
            .await;
        }

        let history = list_state_history(&pool, &exec_id, None).await.unwrap();
        let sequences: Vec<i32> = history.iter().map(|h| h.sequence_number).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(history[0].state_name, "State0");

        cleanup_machine_executions(&pool, &sm).await;
    }

    #[tokio::test]
    async fn test_history_narrowed_to_one_instance() {
        let Some(pool) = test_pool().await else {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        };

        let sm = format!("sm-{}", Uuid::new_v4());
        let exec_id = format!("exec-{}", Uuid::new_v4());
        let old_start = Utc::now() - Duration::days(30);
        let new_start = Utc::now() - Duration::hours(1);
        insert_execution(&pool, &exec_id, &sm, old_start).await;
        insert_execution(&pool, &exec_id, &sm, new_start).await;

        insert_history(&pool, &exec_id, old_start, 0, "Old0", "SUCCEEDED", old_start, None).await;
        insert_history(&pool, &exec_id, new_start, 0, "New0", "RUNNING", new_start, None).await;

        // Without a start time every partition's rows are returned.
        let all = list_state_history(&pool, &exec_id, None).await.unwrap();
        assert_eq!(all.len(), 2);

        // Narrowed to one instance.
        let narrowed = list_state_history(&pool, &exec_id, Some(new_start)).await.unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].state_name, "New0");

        cleanup_machine_executions(&pool, &sm).await;
    }

    #[tokio::test]
    async fn test_earliest_execution_start_time() {
        let Some(pool) = test_pool().await else {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        };

        let sm = format!("sm-{}", Uuid::new_v4());
        let exec_id = format!("exec-{}", Uuid::new_v4());
        // Whole-second precision so the round-trip through TIMESTAMPTZ
        // compares equal.
        let start = chrono::DateTime::from_timestamp(Utc::now().timestamp() - 7200, 0)
            .expect("valid timestamp");
        insert_execution(&pool, &exec_id, &sm, start).await;
        insert_history(&pool, &exec_id, start, 0, "First", "SUCCEEDED", start, None).await;
        insert_history(
            &pool,
            &exec_id,
            start,
            1,
            "Second",
            "RUNNING",
            start + Duration::seconds(5),
            None,
        )
        .await;

        let resolved = earliest_execution_start_time(&pool, &exec_id)
            .await
            .unwrap()
            .expect("start time should resolve");
        assert_eq!(resolved, start);

        let missing = earliest_execution_start_time(&pool, "exec-none").await.unwrap();
        assert!(missing.is_none());

        cleanup_machine_executions(&pool, &sm).await;
    }
}
