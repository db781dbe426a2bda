//! Liveness probe type — `GET /health`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// ```json
/// { "status": "ok", "time": "2026-10-15T12:00:00Z" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    /// Server time, RFC 3339 with second precision.
    pub time: String,
}

impl HealthResponse {
    pub fn ok(now: DateTime<Utc>) -> Self {
        Self {
            status: "ok".into(),
            time: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
