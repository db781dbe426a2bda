//! `GET /health` — liveness probe.

use axum::Json;
use chrono::Utc;
use postboard_api::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(Utc::now()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::handlers::testing::{send, test_app};

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&test_app(), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(body["time"].as_str().unwrap()).is_ok());
    }
}
