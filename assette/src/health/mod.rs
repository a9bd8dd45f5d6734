//! Health check endpoints
//!
//! `/health` pings the record store and reports `503` when it cannot be
//! reached; `/health/live` only says the process is up.

use std::collections::BTreeMap;
use std::time::{Instant, SystemTime};

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Overall or per-component status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Working
    Healthy,
    /// Not working
    Unhealthy,
}

/// One checked dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Result of the check
    pub status: HealthStatus,

    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// How long the check took
    pub response_time_ms: u64,
}

/// Body of `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Worst component status
    pub status: HealthStatus,

    /// Crate version
    pub version: String,

    /// Seconds since the Unix epoch
    pub timestamp: u64,

    /// Per-component results
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthCheckResponse {
    fn new() -> Self {
        Self {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            components: BTreeMap::new(),
        }
    }

    fn add_component(&mut self, name: &str, health: ComponentHealth) {
        if health.status == HealthStatus::Unhealthy {
            self.status = HealthStatus::Unhealthy;
        }
        self.components.insert(name.to_string(), health);
    }

    /// `200` when healthy, `503` otherwise
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HealthCheckResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> HealthCheckResponse {
    let mut response = HealthCheckResponse::new();

    let started = Instant::now();
    let result = state.controller().store().ping().await;
    let response_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let database = match result {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: None,
            response_time_ms,
        },
        Err(err) => {
            tracing::warn!(error = %err, "Health check: store unreachable");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(err.to_string()),
                response_time_ms,
            }
        }
    };
    response.add_component("database", database);

    response
}

/// `GET /health/live`
#[allow(clippy::unused_async)]
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_state;

    #[tokio::test]
    async fn test_healthy_store() {
        let state = memory_state().await;
        let response = health_check(State(state)).await;

        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.components.contains_key("database"));
    }

    #[test]
    fn test_unhealthy_component_marks_response() {
        let mut response = HealthCheckResponse::new();
        response.add_component(
            "database",
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some("pool closed".to_string()),
                response_time_ms: 0,
            },
        );
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["components"]["database"]["message"], "pool closed");
    }
}
