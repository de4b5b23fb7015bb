// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Status taxonomies, sort keys, and time-range filters.
//!
//! The two status enumerations are deliberately distinct: executions can be
//! `ABORTED`/`PAUSED` but individual states cannot, while states can be
//! `RETRYING`/`WAITING` which never applies to a whole execution. Both are
//! closed sets backed by check constraints in the schema.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string did not name a member of a closed status/filter enumeration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    /// What was being parsed (e.g. "execution status").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Execution lifecycle status as written by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Execution is in progress.
    Running,
    /// Execution finished successfully.
    Succeeded,
    /// Execution finished with an error.
    Failed,
    /// Execution was cancelled by a caller.
    Cancelled,
    /// Execution exceeded its time budget.
    TimedOut,
    /// Execution was aborted by the platform.
    Aborted,
    /// Execution is suspended and may re-enter RUNNING.
    Paused,
}

impl ExecutionStatus {
    /// All statuses in declaration order. Used to zero-fill breakdowns.
    pub const ALL: [ExecutionStatus; 7] = [
        ExecutionStatus::Running,
        ExecutionStatus::Succeeded,
        ExecutionStatus::Failed,
        ExecutionStatus::Cancelled,
        ExecutionStatus::TimedOut,
        ExecutionStatus::Aborted,
        ExecutionStatus::Paused,
    ];

    /// Database/API representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Cancelled => "CANCELLED",
            ExecutionStatus::TimedOut => "TIMED_OUT",
            ExecutionStatus::Aborted => "ABORTED",
            ExecutionStatus::Paused => "PAUSED",
        }
    }

    /// Check if this is a terminal status. PAUSED is a suspend state and may
    /// re-enter RUNNING.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Running | ExecutionStatus::Paused)
    }
}

impl FromStr for ExecutionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(ExecutionStatus::Running),
            "SUCCEEDED" => Ok(ExecutionStatus::Succeeded),
            "FAILED" => Ok(ExecutionStatus::Failed),
            "CANCELLED" => Ok(ExecutionStatus::Cancelled),
            "TIMED_OUT" => Ok(ExecutionStatus::TimedOut),
            "ABORTED" => Ok(ExecutionStatus::Aborted),
            "PAUSED" => Ok(ExecutionStatus::Paused),
            other => Err(ParseEnumError::new("execution status", other)),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-state status within one execution's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateStatus {
    /// State completed successfully.
    Succeeded,
    /// State failed.
    Failed,
    /// State is executing.
    Running,
    /// State was cancelled.
    Cancelled,
    /// State exceeded its time budget.
    TimedOut,
    /// State failed and a retry is scheduled.
    Retrying,
    /// State is waiting on an external message.
    Waiting,
}

impl StateStatus {
    /// Database/API representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateStatus::Succeeded => "SUCCEEDED",
            StateStatus::Failed => "FAILED",
            StateStatus::Running => "RUNNING",
            StateStatus::Cancelled => "CANCELLED",
            StateStatus::TimedOut => "TIMED_OUT",
            StateStatus::Retrying => "RETRYING",
            StateStatus::Waiting => "WAITING",
        }
    }
}

impl FromStr for StateStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCEEDED" => Ok(StateStatus::Succeeded),
            "FAILED" => Ok(StateStatus::Failed),
            "RUNNING" => Ok(StateStatus::Running),
            "CANCELLED" => Ok(StateStatus::Cancelled),
            "TIMED_OUT" => Ok(StateStatus::TimedOut),
            "RETRYING" => Ok(StateStatus::Retrying),
            "WAITING" => Ok(StateStatus::Waiting),
            other => Err(ParseEnumError::new("state status", other)),
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ParseEnumError::new("sort order", other)),
        }
    }
}

/// Sortable columns for execution listings.
///
/// The closed mapping to column names keeps dynamic ORDER BY clauses out of
/// reach of user input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionSortKey {
    /// Sort by execution start time.
    #[default]
    StartTime,
    /// Sort by execution end time (NULLs sort per storage default).
    EndTime,
    /// Sort by status.
    Status,
}

impl ExecutionSortKey {
    /// Column reference for this sort key.
    pub fn column(&self) -> &'static str {
        match self {
            ExecutionSortKey::StartTime => "start_time",
            ExecutionSortKey::EndTime => "end_time",
            ExecutionSortKey::Status => "status",
        }
    }
}

impl FromStr for ExecutionSortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startTime" => Ok(ExecutionSortKey::StartTime),
            "endTime" => Ok(ExecutionSortKey::EndTime),
            "status" => Ok(ExecutionSortKey::Status),
            other => Err(ParseEnumError::new("execution sort key", other)),
        }
    }
}

/// Sortable columns for state machine listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateMachineSortKey {
    /// Sort by display name.
    Name,
    /// Sort by creation time.
    #[default]
    CreatedAt,
    /// Sort by last update time.
    UpdatedAt,
}

impl StateMachineSortKey {
    /// Column reference for this sort key.
    pub fn column(&self) -> &'static str {
        match self {
            StateMachineSortKey::Name => "name",
            StateMachineSortKey::CreatedAt => "created_at",
            StateMachineSortKey::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for StateMachineSortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(StateMachineSortKey::Name),
            "createdAt" => Ok(StateMachineSortKey::CreatedAt),
            "updatedAt" => Ok(StateMachineSortKey::UpdatedAt),
            other => Err(ParseEnumError::new("state machine sort key", other)),
        }
    }
}

/// Named relative time ranges for execution listings.
///
/// Mutually exclusive with explicit start/end dates; when a named range is
/// given, explicit dates are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRange {
    /// Since the start of the current UTC day.
    #[serde(rename = "today")]
    Today,
    /// Trailing 7 days.
    #[serde(rename = "7d")]
    SevenDays,
    /// Trailing 30 days.
    #[serde(rename = "30d")]
    ThirtyDays,
    /// Trailing 90 days.
    #[serde(rename = "90d")]
    NinetyDays,
}

impl DateRange {
    /// API representation of this range.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::SevenDays => "7d",
            DateRange::ThirtyDays => "30d",
            DateRange::NinetyDays => "90d",
        }
    }

    /// Inclusive lower bound on start_time for this range, relative to `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DateRange::Today => now.date_naive().and_time(NaiveTime::MIN).and_utc(),
            DateRange::SevenDays => now - Duration::days(7),
            DateRange::ThirtyDays => now - Duration::days(30),
            DateRange::NinetyDays => now - Duration::days(90),
        }
    }
}

impl FromStr for DateRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateRange::Today),
            "7d" => Ok(DateRange::SevenDays),
            "30d" => Ok(DateRange::ThirtyDays),
            "90d" => Ok(DateRange::NinetyDays),
            other => Err(ParseEnumError::new("date range", other)),
        }
    }
}
