//! Per-request access logging.
//!
//! Emits one `"request completed"` event per request with method, path,
//! status, latency and excerpts of both bodies. Bodies are buffered only when
//! their length is known up front and at most [`MAX_BUFFERED_BODY`]; anything
//! else streams through untouched and is logged as omitted. Logged excerpts
//! are cut at [`MAX_LOGGED_BODY`] bytes.

use std::time::Instant;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

pub const MAX_BUFFERED_BODY: usize = 64 * 1024;
pub const MAX_LOGGED_BODY: usize = 2 * 1024;

const OMITTED: &str = "<omitted>";

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let (parts, body) = req.into_parts();
    let (body, request) = match capture(body).await {
        Ok(captured) => captured,
        Err(e) => {
            let resp = AppError::BadRequest(format!("failed to read request body: {e}"))
                .into_response();
            emit(&method, &path, resp.status(), start, OMITTED, OMITTED);
            return resp;
        }
    };

    let resp = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = resp.into_parts();
    let (body, response) = match capture(body).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::error!("failed to read response body: {e}");
            (Body::empty(), OMITTED.to_string())
        }
    };

    emit(&method, &path, parts.status, start, &request, &response);
    Response::from_parts(parts, body)
}

/// Buffer `body` if it is small and of known size; return the (re-wrapped)
/// body together with the text to log.
async fn capture(body: Body) -> Result<(Body, String), axum::Error> {
    match body.size_hint().upper() {
        Some(0) => Ok((body, String::new())),
        Some(n) if n <= MAX_BUFFERED_BODY as u64 => {
            let bytes = axum::body::to_bytes(body, MAX_BUFFERED_BODY).await?;
            let text = excerpt(&bytes);
            Ok((Body::from(bytes), text))
        }
        _ => Ok((body, OMITTED.to_string())),
    }
}

fn excerpt(bytes: &Bytes) -> String {
    if bytes.len() <= MAX_LOGGED_BODY {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        format!(
            "{}...[truncated {} bytes]",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY]),
            bytes.len() - MAX_LOGGED_BODY
        )
    }
}

fn emit(
    method: &axum::http::Method,
    path: &str,
    status: StatusCode,
    start: Instant,
    request: &str,
    response: &str,
) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = status.as_u16();
    if status >= 500 {
        tracing::error!(%method, path, status, latency_ms, request, response, "request completed");
    } else if status >= 400 {
        tracing::warn!(%method, path, status, latency_ms, request, response, "request completed");
    } else {
        tracing::info!(%method, path, status, latency_ms, request, response, "request completed");
    }
}
