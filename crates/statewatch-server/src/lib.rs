// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Statewatch Server - HTTP API for the monitoring dashboard.
//!
//! Exposes the read/aggregation operations of `statewatch-core` and the
//! forwarding operations of `statewatch-orchestrator-sdk` as a JSON API.
//! Every handler is a single request/response cycle over shared state (one
//! connection pool, one orchestrator client); there are no background tasks
//! and no in-process session state, so the server scales horizontally.
//!
//! Routes:
//!
//! | Method | Path                                   | Purpose                         |
//! |--------|----------------------------------------|---------------------------------|
//! | GET    | /state-machines                        | paginated machine listing       |
//! | POST   | /state-machines                        | forward machine creation        |
//! | GET    | /state-machines/{id}                   | machine detail, parsed definition |
//! | GET    | /executions                            | filtered listing / single lookup |
//! | GET    | /executions/{executionId}              | latest-partition lookup         |
//! | GET    | /executions/{executionId}/start-time   | composite-key resolution        |
//! | POST   | /executions/launch                     | forward single launch           |
//! | POST   | /executions/launch-batch               | forward batch launch            |
//! | GET    | /state-history                         | enriched execution timeline     |
//! | GET    | /dashboard/stats                       | degraded-tolerant aggregates    |
//! | GET    | /health                                | this layer's liveness           |
//! | GET    | /service-health                        | downstream liveness, always 200 |
//! | GET    | /transformers                          | proxied transformer catalog     |

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::router;
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use state::AppState;
