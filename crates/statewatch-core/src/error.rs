// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for statewatch-core.

use thiserror::Error;

/// Result type using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the relational store.
///
/// Absent rows are represented as `Option`/empty `Vec` at this layer and
/// materialized into not-found responses at the API boundary. Raw database
/// detail must not leak to clients; callers log it and surface a generic
/// message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
