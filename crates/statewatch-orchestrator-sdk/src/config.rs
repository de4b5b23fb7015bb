// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the orchestrator SDK.

use std::time::Duration;

use crate::error::{Result, SdkError};

/// Fixed path prefix the orchestration service mounts its API under.
pub const API_PREFIX: &str = "/state-machines/api/v1";

/// Configuration for the [`crate::OrchestratorClient`].
///
/// Resolved once at startup and injected; never read from the environment
/// per request.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Base URL of the orchestration service.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Timeout for health checks and transformer listing.
    pub health_timeout: Duration,
    /// Timeout for create/launch forwards.
    pub launch_timeout: Duration,
    /// Timeout for batch launch forwards, which may enumerate many source
    /// executions downstream.
    pub batch_timeout: Duration,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9090".to_string(),
            connect_timeout: Duration::from_secs(5),
            health_timeout: Duration::from_secs(5),
            launch_timeout: Duration::from_secs(10),
            batch_timeout: Duration::from_secs(15),
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STATE_MACHINE_SERVICE_URL`: Base URL (default: "http://localhost:9090")
    /// - `STATEWATCH_SERVICE_CONNECT_TIMEOUT_MS`: Connect timeout in milliseconds (default: 5000)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("STATE_MACHINE_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:9090".to_string());

        reqwest::Url::parse(&base_url)
            .map_err(|e| SdkError::Config(format!("invalid STATE_MACHINE_SERVICE_URL: {}", e)))?;

        let connect_timeout_ms: u64 = std::env::var("STATEWATCH_SERVICE_CONNECT_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|e| {
                SdkError::Config(format!(
                    "invalid STATEWATCH_SERVICE_CONNECT_TIMEOUT_MS: {}",
                    e
                ))
            })?;

        Ok(Self {
            base_url,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            ..Self::default()
        })
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the health/transformers timeout.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Set the create/launch timeout.
    pub fn with_launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = timeout;
        self
    }

    /// Set the batch launch timeout.
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// Base URL with any trailing slash removed, ready for path joining.
    pub(crate) fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SdkConfig::default();
        assert_eq!(config.base_url, "http://localhost:9090");
        assert_eq!(config.health_timeout, Duration::from_secs(5));
        assert_eq!(config.launch_timeout, Duration::from_secs(10));
        assert_eq!(config.batch_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_builder_methods() {
        let config = SdkConfig::new()
            .with_base_url("http://orchestrator:9090/")
            .with_health_timeout(Duration::from_secs(2))
            .with_launch_timeout(Duration::from_secs(20))
            .with_batch_timeout(Duration::from_secs(30));

        assert_eq!(config.base_url, "http://orchestrator:9090/");
        assert_eq!(config.trimmed_base_url(), "http://orchestrator:9090");
        assert_eq!(config.health_timeout, Duration::from_secs(2));
        assert_eq!(config.launch_timeout, Duration::from_secs(20));
        assert_eq!(config.batch_timeout, Duration::from_secs(30));
    }
}
