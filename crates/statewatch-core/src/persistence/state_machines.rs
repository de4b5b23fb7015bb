// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Read operations over the state_machines table.

use sqlx::PgPool;

use super::StateMachineRecord;
use crate::error::Result;
use crate::models::{SortOrder, StateMachineSortKey};

const SELECT_COLUMNS: &str = "id, name, description, definition, type AS machine_type, \
     version, metadata, created_at, updated_at";

/// Get a state machine by id.
pub async fn get_state_machine(
    pool: &PgPool,
    id: &str,
) -> Result<Option<StateMachineRecord>> {
    let record = sqlx::query_as::<_, StateMachineRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM state_machines
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// List state machines with optional name substring search, sorted by a
/// closed set of columns.
pub async fn list_state_machines(
    pool: &PgPool,
    search: Option<&str>,
    sort_by: StateMachineSortKey,
    order: SortOrder,
    limit: i64,
    offset: i64,
) -> Result<Vec<StateMachineRecord>> {
    let column = sort_by.column();
    let direction = order.as_sql();

    let records = sqlx::query_as::<_, StateMachineRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM state_machines
        WHERE ($1::TEXT IS NULL OR name LIKE '%' || $1 || '%')
        ORDER BY {column} {direction}
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(search)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Count state machines matching the same search predicate as
/// [`list_state_machines`], without limit/offset.
pub async fn count_state_machines(pool: &PgPool, search: Option<&str>) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM state_machines
        WHERE ($1::TEXT IS NULL OR name LIKE '%' || $1 || '%')
        "#,
    )
    .bind(search)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

/// Count all registered state machines.
pub async fn count_all_state_machines(pool: &PgPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM state_machines")
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::migrations::POSTGRES.run(&pool).await.ok()?;
        Some(pool)
    }

    async fn insert_machine(pool: &PgPool, id: &str, name: &str) {
        sqlx::query(
            r#"
            INSERT INTO state_machines (id, name, definition, type, version)
            VALUES ($1, $2, '{"StartAt":"First","States":{}}', 'STANDARD', '1.0')
            "#,
        )
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to insert test state machine");
    }

    async fn cleanup_machine(pool: &PgPool, id: &str) {
        sqlx::query("DELETE FROM state_machines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .ok();
    }

    #[tokio::test]
    async fn test_get_state_machine() {
        let Some(pool) = test_pool().await else {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        };

        let id = format!("sm-{}", Uuid::new_v4());
        insert_machine(&pool, &id, "order-pipeline").await;

        let machine = get_state_machine(&pool, &id).await.unwrap().unwrap();
        assert_eq!(machine.id, id);
        assert_eq!(machine.name, "order-pipeline");
        assert_eq!(machine.machine_type.as_deref(), Some("STANDARD"));
        assert_eq!(machine.version, "1.0");

        let missing = get_state_machine(&pool, "does-not-exist").await.unwrap();
        assert!(missing.is_none());

        cleanup_machine(&pool, &id).await;
    }

    #[tokio::test]
    async fn test_list_state_machines_search_and_pagination() {
        let Some(pool) = test_pool().await else {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        };

        let marker = Uuid::new_v4().simple().to_string();
        let ids: Vec<String> = (0..3).map(|i| format!("sm-{marker}-{i}")).collect();
        for (i, id) in ids.iter().enumerate() {
            insert_machine(&pool, id, &format!("pipeline-{marker}-{i}")).await;
        }

        let total = count_state_machines(&pool, Some(&marker)).await.unwrap();
        assert_eq!(total, 3);

        let page1 = list_state_machines(
            &pool,
            Some(&marker),
            StateMachineSortKey::Name,
            SortOrder::Asc,
            2,
            0,
        )
        .await
        .unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].name, format!("pipeline-{marker}-0"));

        let page2 = list_state_machines(
            &pool,
            Some(&marker),
            StateMachineSortKey::Name,
            SortOrder::Asc,
            2,
            2,
        )
        .await
        .unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].name, format!("pipeline-{marker}-2"));

        for id in &ids {
            cleanup_machine(&pool, id).await;
        }
    }

    #[tokio::test]
    async fn test_list_state_machines_sort_desc() {
        let Some(pool) = test_pool().await else {
            eprintln!("Skipping test: TEST_DATABASE_URL not set");
            return;
        };

        let marker = Uuid::new_v4().simple().to_string();
        let ids: Vec<String> = (0..2).map(|i| format!("sm-{marker}-{i}")).collect();
        for (i, id) in ids.iter().enumerate() {
            insert_machine(&pool, id, &format!("flow-{marker}-{i}")).await;
        }

        let rows = list_state_machines(
            &pool,
            Some(&marker),
            StateMachineSortKey::Name,
            SortOrder::Desc,
            10,
            0,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, format!("flow-{marker}-1"));
        assert_eq!(rows[1].name, format!("flow-{marker}-0"));

        for id in &ids {
            cleanup_machine(&pool, id).await;
        }
    }
}
