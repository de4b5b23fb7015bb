// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Statewatch Core - Execution Data Model and Query Layer
//!
//! This crate owns the relational schema and all read/aggregation operations
//! for the statewatch dashboard: state machines, executions (time-partitioned
//! by start time), and per-state history. It never mutates execution state;
//! rows are written by the downstream orchestration service and only read
//! here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    statewatch-server                        │
//! │               (HTTP API, axum handlers)                     │
//! └─────────────────────────────────────────────────────────────┘
//!               │                              │
//!               │ queries                      │ forwards writes
//!               ▼                              ▼
//! ┌───────────────────────┐      ┌─────────────────────────────┐
//! │   statewatch-core     │      │ statewatch-orchestrator-sdk │
//! │   (This Crate)        │      │   (HTTP client, reqwest)    │
//! └───────────────────────┘      └─────────────────────────────┘
//!               │                              │
//!               ▼                              ▼
//! ┌───────────────────────┐      ┌─────────────────────────────┐
//! │      PostgreSQL       │      │   orchestration service     │
//! │ (executions, history) │      │ (STATE_MACHINE_SERVICE_URL) │
//! └───────────────────────┘      └─────────────────────────────┘
//! ```
//!
//! # Key contracts
//!
//! - `(execution_id, start_time)` is the execution primary key; the same
//!   execution id may recur across time partitions. Lookups by id alone
//!   resolve to the row with the most recent start time.
//! - State history entries are totally ordered per execution by
//!   `sequence_number`; replaying them in ascending order reconstructs the
//!   execution timeline.
//! - Status taxonomies are closed enumerations ([`models::ExecutionStatus`]
//!   and [`models::StateStatus`]) enforced by check constraints. Transition
//!   legality is never validated here; whatever the orchestrator wrote is
//!   recorded and rendered.

pub mod error;
pub mod migrations;
pub mod models;
pub mod persistence;
pub mod timeline;

pub use error::{Result, StoreError};
