// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP API routes and shared request plumbing.

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use statewatch_orchestrator_sdk::FieldViolation;

use crate::state::AppState;

pub mod dashboard;
pub mod executions;
pub mod health;
pub mod state_history;
pub mod state_machines;
pub mod transformers;

/// Largest accepted page size for any listing.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Build the API router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/state-machines",
            get(state_machines::list).post(state_machines::create),
        )
        .route("/state-machines/{id}", get(state_machines::get))
        .route("/executions", get(executions::list))
        .route("/executions/launch", post(executions::launch))
        .route("/executions/launch-batch", post(executions::launch_batch))
        .route("/executions/{executionId}", get(executions::get))
        .route(
            "/executions/{executionId}/start-time",
            get(executions::start_time),
        )
        .route("/state-history", get(state_history::get))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/health", get(health::health))
        .route("/service-health", get(health::service_health))
        .route("/transformers", get(transformers::list))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Offset pagination echo attached to listing responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: i64,
    /// Rows per page.
    pub page_size: i64,
    /// Total rows matching the filter predicate, unpaginated.
    pub total: i64,
    /// ceil(total / pageSize).
    pub total_pages: i64,
}

impl Pagination {
    /// Build the echo for a page of `total` matching rows.
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        }
    }

    /// Rows to skip for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Parse a 1-based page number, collecting a violation on bad input.
pub(crate) fn parse_page(raw: Option<&str>, violations: &mut Vec<FieldViolation>) -> i64 {
    match raw {
        None => 1,
        Some(s) => match s.parse::<i64>() {
            Ok(page) if page >= 1 => page,
            _ => {
                violations.push(FieldViolation::new("page", "must be a positive integer"));
                1
            }
        },
    }
}

/// Parse a bounded page size, collecting a violation on bad input.
pub(crate) fn parse_page_size(
    raw: Option<&str>,
    default: i64,
    violations: &mut Vec<FieldViolation>,
) -> i64 {
    match raw {
        None => default,
        Some(s) => match s.parse::<i64>() {
            Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
            _ => {
                violations.push(FieldViolation::new(
                    "pageSize",
                    "must be an integer between 1 and 1000",
                ));
                default
            }
        },
    }
}

/// Parse a closed enumeration via its `FromStr`, collecting a violation on
/// unknown values.
pub(crate) fn parse_enum<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &'static str,
    message: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            violations.push(FieldViolation::new(field, message));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_totals() {
        let p = Pagination::new(1, 25, 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(2, 25, 51);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset(), 25);

        let p = Pagination::new(1, 25, 50);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_parse_page_defaults_and_rejects() {
        let mut violations = Vec::new();
        assert_eq!(parse_page(None, &mut violations), 1);
        assert_eq!(parse_page(Some("3"), &mut violations), 3);
        assert!(violations.is_empty());

        parse_page(Some("0"), &mut violations);
        parse_page(Some("x"), &mut violations);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_parse_page_size_bounds() {
        let mut violations = Vec::new();
        assert_eq!(parse_page_size(None, 25, &mut violations), 25);
        assert_eq!(parse_page_size(Some("1000"), 25, &mut violations), 1000);
        assert!(violations.is_empty());

        parse_page_size(Some("1001"), 25, &mut violations);
        parse_page_size(Some("0"), 25, &mut violations);
        assert_eq!(violations.len(), 2);
    }
}
