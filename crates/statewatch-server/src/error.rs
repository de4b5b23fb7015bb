// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! API error taxonomy and HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use statewatch_core::StoreError;
use statewatch_orchestrator_sdk::{FieldViolation, SdkError};

/// Errors surfaced by request handlers.
///
/// Mapping to HTTP:
/// - `Validation` → 400 with field-level violations;
/// - `NotFound` → 404 naming the missing identifier;
/// - `Upstream` → the downstream's own status code (500 when the call never
///   completed), with the raw downstream text preserved in `details`;
/// - `Storage`/`Internal` → 500 with a generic body. Raw database errors are
///   logged server-side and never leak to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation; no I/O was performed.
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    /// No matching row.
    #[error("{0}")]
    NotFound(String),

    /// The downstream orchestration service failed.
    #[error("{context}")]
    Upstream {
        /// What this layer was trying to do.
        context: &'static str,
        /// Downstream HTTP status, when the call completed.
        status: Option<u16>,
        /// Raw downstream error text.
        details: String,
    },

    /// The relational store failed.
    #[error("storage error")]
    Storage(#[from] StoreError),

    /// Anything else that should read as a 500.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map an SDK failure into the API taxonomy, attaching the operation
    /// context used in the response body.
    pub fn from_sdk(context: &'static str, err: SdkError) -> Self {
        match err {
            SdkError::Validation(violations) => ApiError::Validation(violations),
            SdkError::Upstream { status, body } => ApiError::Upstream {
                context,
                status: Some(status),
                details: body,
            },
            SdkError::Transport(e) => ApiError::Upstream {
                context,
                status: None,
                details: e.to_string(),
            },
            SdkError::UnexpectedResponse(msg) => ApiError::Upstream {
                context,
                status: None,
                details: msg,
            },
            SdkError::Config(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Validation failed",
                    "details": violations,
                })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Upstream {
                context,
                status,
                details,
            } => {
                let code = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    code,
                    Json(json!({
                        "error": context,
                        "details": details,
                        "statusCode": status,
                    })),
                )
                    .into_response()
            }
            ApiError::Storage(err) => {
                error!(error = %err, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            ApiError::Internal(message) => {
                error!(error = %message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
