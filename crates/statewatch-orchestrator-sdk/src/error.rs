// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for statewatch-orchestrator-sdk.

use serde::Serialize;
use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field (request shape, camelCase).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldViolation {
    /// Create a violation for `field` with the given message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur when forwarding to the orchestration service.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request failed validation before any network call was made.
    #[error("validation failed: {}", describe_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Downstream service answered with a non-2xx status. The raw body is
    /// preserved for debuggability.
    #[error("downstream service returned {status}: {body}")]
    Upstream {
        /// HTTP status the downstream returned.
        status: u16,
        /// Raw downstream response body.
        body: String,
    },

    /// The call itself failed (connect error, timeout, protocol error).
    #[error("downstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Downstream answered 2xx with a body this client could not interpret.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_fields() {
        let err = SdkError::Validation(vec![
            FieldViolation::new("name", "must not be empty"),
            FieldViolation::new("concurrency", "must be between 1 and 100"),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("name: must not be empty"));
        assert!(rendered.contains("concurrency: must be between 1 and 100"));
    }

    #[test]
    fn test_upstream_display_keeps_body() {
        let err = SdkError::Upstream {
            status: 409,
            body: "state machine already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "downstream service returned 409: state machine already exists"
        );
    }
}
