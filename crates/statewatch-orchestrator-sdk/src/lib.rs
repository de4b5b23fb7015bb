// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Statewatch Orchestrator SDK
//!
//! HTTP client for the downstream state-machine orchestration service
//! (`STATE_MACHINE_SERVICE_URL`). The dashboard never mutates execution
//! state itself; creation and launch requests are validated here and then
//! forwarded unchanged, and the downstream response is passed back verbatim
//! together with its HTTP status.
//!
//! # Contract
//!
//! - Validation always happens before any network I/O; a request that fails
//!   validation produces [`SdkError::Validation`] without touching the wire.
//! - Every call is bounded by a per-operation timeout (health 5s, launches
//!   10s, batch launches 15s by default).
//! - Downstream failures are never swallowed or retried: non-2xx responses
//!   become [`SdkError::Upstream`] carrying the original status code and raw
//!   body. Retrying "start execution" without a client-supplied idempotency
//!   key is not safe, so retries stay the caller's responsibility.
//!
//! # Example
//!
//! ```no_run
//! use statewatch_orchestrator_sdk::{LaunchExecutionRequest, OrchestratorClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OrchestratorClient::from_env()?;
//!
//! let request = LaunchExecutionRequest {
//!     state_machine_id: "order-pipeline".to_string(),
//!     name: "order-42".to_string(),
//!     input: Some(serde_json::json!({"orderId": 42})),
//!     ..Default::default()
//! };
//! let forwarded = client.launch_execution(&request).await?;
//! println!("downstream answered {}", forwarded.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::OrchestratorClient;
pub use config::SdkConfig;
pub use error::{FieldViolation, Result, SdkError};
pub use types::{
    BatchMode, BatchSourceFilter, CreateStateMachineRequest, Forwarded, LaunchBatchRequest,
    LaunchExecutionRequest, TransformerInfo,
};
