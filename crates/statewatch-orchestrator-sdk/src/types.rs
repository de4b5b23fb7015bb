// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request and response types for the orchestrator SDK.
//!
//! Every request type carries its own `validate()` returning field-level
//! violations; the client refuses to touch the network until validation
//! passes. Bounds are rejected, never clamped, so a caller asking for
//! `concurrency: 101` learns about it instead of silently getting 100.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldViolation;

/// Execution statuses accepted by batch source filters. Mirrors the
/// downstream taxonomy; the dashboard never interprets them.
const EXECUTION_STATUSES: [&str; 7] = [
    "RUNNING",
    "SUCCEEDED",
    "FAILED",
    "CANCELLED",
    "TIMED_OUT",
    "ABORTED",
    "PAUSED",
];

fn default_machine_type() -> String {
    "STANDARD".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_batch_limit() -> i64 {
    10
}

fn default_concurrency() -> i64 {
    5
}

/// Request to register a new state machine with the orchestrator.
///
/// The `definition` document is forwarded opaquely; only its shape (a JSON
/// object) is checked here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStateMachineRequest {
    /// User-assigned unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque state machine definition document.
    pub definition: Value,
    /// Free-form type tag.
    #[serde(rename = "type", default = "default_machine_type")]
    pub machine_type: String,
    /// Free-form version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// Key-value metadata document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl CreateStateMachineRequest {
    /// Check the request shape. Returns every violation, not just the first.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.id.trim().is_empty() {
            violations.push(FieldViolation::new("id", "ID is required"));
        }
        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "Name is required"));
        }
        if !self.definition.is_object() {
            violations.push(FieldViolation::new(
                "definition",
                "Definition must be a JSON object",
            ));
        }
        violations
    }
}

/// Request to launch a single execution.
///
/// At least one of `input` or `source_execution_id` must be present; both
/// may be. The source fields describe "resume/fork from a prior execution's
/// state", interpreted entirely by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchExecutionRequest {
    /// Target state machine. Carried in the URL path, not the forwarded
    /// body.
    #[serde(skip_serializing)]
    pub state_machine_id: String,
    /// Display name for the new execution.
    pub name: String,
    /// Opaque input payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Prior execution to fork/resume from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_execution_id: Option<String>,
    /// State within the source execution to resume at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_state_name: Option<String>,
    /// Named transformer applied to the source state's input downstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_input_transformer: Option<String>,
}

impl LaunchExecutionRequest {
    /// Check the request shape. Returns every violation, not just the first.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.state_machine_id.trim().is_empty() {
            violations.push(FieldViolation::new(
                "stateMachineId",
                "State Machine ID is required",
            ));
        }
        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "Execution name is required"));
        }
        if self.input.is_none() && self.source_execution_id.is_none() {
            violations.push(FieldViolation::new(
                "input",
                "Either 'input' or 'sourceExecutionId' must be provided",
            ));
        }
        violations
    }
}

/// Source-execution filter within a batch launch request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSourceFilter {
    /// State machine whose past executions seed the batch.
    pub source_state_machine_id: String,
    /// Restrict source executions to one status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Inclusive lower bound on source start time, Unix epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_from: Option<i64>,
    /// Inclusive upper bound on source start time, Unix epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_to: Option<i64>,
    /// Glob pattern over source execution names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
    /// Maximum number of source executions to enumerate.
    #[serde(default = "default_batch_limit")]
    pub limit: i64,
}

/// How the orchestrator runs a batch's launches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// Spread launches across orchestrator workers.
    Distributed,
    /// Launch up to `concurrency` executions at a time.
    #[default]
    Concurrent,
    /// Launch one at a time.
    Sequential,
}

/// Request to launch a batch of executions seeded from prior executions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchBatchRequest {
    /// Target state machine. Carried in the URL path, not the forwarded
    /// body.
    #[serde(skip_serializing)]
    pub state_machine_id: String,
    /// Which source executions to seed from.
    pub filter: BatchSourceFilter,
    /// Prefix for the generated execution names.
    pub name_prefix: String,
    /// Parallelism the orchestrator applies in `concurrent` mode.
    #[serde(default = "default_concurrency")]
    pub concurrency: i64,
    /// Launch scheduling mode.
    #[serde(default)]
    pub mode: BatchMode,
    /// Stop the batch at the first failed launch.
    #[serde(default)]
    pub stop_on_error: bool,
}

impl LaunchBatchRequest {
    /// Check the request shape. Returns every violation, not just the first.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.state_machine_id.trim().is_empty() {
            violations.push(FieldViolation::new(
                "stateMachineId",
                "State Machine ID is required",
            ));
        }
        if self.filter.source_state_machine_id.trim().is_empty() {
            violations.push(FieldViolation::new(
                "filter.sourceStateMachineId",
                "Source State Machine ID is required",
            ));
        }
        if let Some(status) = &self.filter.status {
            if !EXECUTION_STATUSES.contains(&status.as_str()) {
                violations.push(FieldViolation::new(
                    "filter.status",
                    "must be a valid execution status",
                ));
            }
        }
        if !(1..=1000).contains(&self.filter.limit) {
            violations.push(FieldViolation::new(
                "filter.limit",
                "must be between 1 and 1000",
            ));
        }
        if self.name_prefix.trim().is_empty() {
            violations.push(FieldViolation::new("namePrefix", "Name prefix is required"));
        }
        if !(1..=100).contains(&self.concurrency) {
            violations.push(FieldViolation::new(
                "concurrency",
                "must be between 1 and 100",
            ));
        }
        violations
    }
}

/// A downstream response passed back verbatim: the HTTP status the
/// orchestrator answered with and its JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct Forwarded {
    /// Downstream HTTP status code.
    pub status: u16,
    /// Downstream response body.
    pub body: Value,
}

/// One named input-transformation function available downstream.
///
/// The orchestrator reports bare identifiers; they are mapped to id/name
/// pairs for the dashboard's select widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformerInfo {
    /// Opaque transformer identifier.
    pub id: String,
    /// Display name (same as the identifier; downstream reports no more).
    pub name: String,
    /// Description, when the downstream provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
