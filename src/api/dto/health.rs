//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

/// Response for `GET /healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` or `"degraded"`.
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Individual component health checks.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub view_queue: CheckStatus,
    pub cache: CheckStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckStatus {
    /// `"ok"` or `"error"`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
