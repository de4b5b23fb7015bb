// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP client forwarding validated requests to the orchestration service.

use reqwest::RequestBuilder;
use tracing::{debug, instrument, warn};

use crate::config::{API_PREFIX, SdkConfig};
use crate::error::{Result, SdkError};
use crate::types::{
    CreateStateMachineRequest, Forwarded, LaunchBatchRequest, LaunchExecutionRequest,
    TransformerInfo,
};

/// Client for the downstream state-machine orchestration service.
///
/// Stateless and cheap to clone behind an `Arc`; resolved once at startup
/// and injected into request handlers. Every method validates before any
/// network I/O, applies its per-operation timeout, and passes downstream
/// failures through verbatim — no retries.
pub struct OrchestratorClient {
    http: reqwest::Client,
    config: SdkConfig,
}

impl OrchestratorClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SdkConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(SdkError::Transport)?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SdkConfig::from_env()?)
    }

    /// Create a client for localhost development.
    pub fn localhost() -> Result<Self> {
        Self::new(SdkConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.trimmed_base_url(), API_PREFIX, path)
    }

    /// Send a request and pass the downstream answer through verbatim.
    ///
    /// Non-2xx responses become [`SdkError::Upstream`] carrying the raw
    /// body; nothing is synthesized or swallowed.
    async fn forward(&self, builder: RequestBuilder) -> Result<Forwarded> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Downstream service error");
            return Err(SdkError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json().await?;
        Ok(Forwarded {
            status: status.as_u16(),
            body,
        })
    }

    /// Register a new state machine with the orchestrator.
    ///
    /// The orchestrator owns persistence; this layer only checks the request
    /// shape and forwards it.
    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn create_state_machine(
        &self,
        request: &CreateStateMachineRequest,
    ) -> Result<Forwarded> {
        let violations = request.validate();
        if !violations.is_empty() {
            return Err(SdkError::Validation(violations));
        }

        debug!("Forwarding state machine creation");

        self.forward(
            self.http
                .post(self.url("/state-machines"))
                .timeout(self.config.launch_timeout)
                .json(request),
        )
        .await
    }

    /// Launch one execution of a state machine.
    ///
    /// The target machine id travels in the URL path; the forwarded body
    /// carries only the launch fields.
    #[instrument(skip(self, request), fields(state_machine_id = %request.state_machine_id))]
    pub async fn launch_execution(&self, request: &LaunchExecutionRequest) -> Result<Forwarded> {
        let violations = request.validate();
        if !violations.is_empty() {
            return Err(SdkError::Validation(violations));
        }

        debug!(name = %request.name, "Forwarding execution launch");

        let path = format!(
            "/state-machines/{}/executions",
            urlencoding::encode(&request.state_machine_id)
        );
        self.forward(
            self.http
                .post(self.url(&path))
                .timeout(self.config.launch_timeout)
                .json(request),
        )
        .await
    }

    /// Launch a batch of executions seeded from prior executions.
    ///
    /// Uses the longer batch timeout; the orchestrator may enumerate many
    /// source executions before answering.
    #[instrument(skip(self, request), fields(state_machine_id = %request.state_machine_id))]
    pub async fn launch_batch(&self, request: &LaunchBatchRequest) -> Result<Forwarded> {
        let violations = request.validate();
        if !violations.is_empty() {
            return Err(SdkError::Validation(violations));
        }

        debug!(name_prefix = %request.name_prefix, "Forwarding batch launch");

        let path = format!(
            "/state-machines/{}/executions/batch",
            urlencoding::encode(&request.state_machine_id)
        );
        self.forward(
            self.http
                .post(self.url(&path))
                .timeout(self.config.batch_timeout)
                .json(request),
        )
        .await
    }

    /// Check health of the orchestration service.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Forwarded> {
        self.forward(
            self.http
                .get(self.url("/health"))
                .timeout(self.config.health_timeout),
        )
        .await
    }

    /// List the named input-transformation functions available downstream.
    ///
    /// The orchestrator answers `{"transformers": ["id", ...]}`; the bare
    /// identifiers are mapped to [`TransformerInfo`] records.
    #[instrument(skip(self))]
    pub async fn list_transformers(&self) -> Result<Vec<TransformerInfo>> {
        let forwarded = self
            .forward(
                self.http
                    .get(self.url("/transformers"))
                    .timeout(self.config.health_timeout),
            )
            .await?;

        let ids = forwarded
            .body
            .get("transformers")
            .and_then(|t| t.as_array())
            .ok_or_else(|| {
                SdkError::UnexpectedResponse("expected a 'transformers' array".to_string())
            })?;

        Ok(ids
            .iter()
            .filter_map(|id| id.as_str())
            .map(|id| TransformerInfo {
                id: id.to_string(),
                name: id.to_string(),
                description: None,
            })
            .collect())
    }
}
