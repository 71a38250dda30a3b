use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, info, info_span};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Reuse the caller's `X-Request-Id` or mint one, and echo it on the response.
///
/// The id is written back into the request headers so handlers can log it.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_id(req.headers()).unwrap_or_else(new_request_id);
    let value = HeaderValue::from_str(&id).ok();
    if let Some(v) = &value {
        req.headers_mut().insert(X_REQUEST_ID, v.clone());
    }

    let span = info_span!(
        "http_request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let started = Instant::now();
        let mut res = next.run(req).await;
        if let Some(v) = value {
            res.headers_mut().insert(X_REQUEST_ID, v);
        }
        info!(
            status = res.status().as_u16(),
            latency_ms = started.elapsed().as_millis(),
            "request finished"
        );
        res
    }
    .instrument(span)
    .await
}

/// Request id as set by the middleware, for handler logging.
pub fn request_id_of(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}

fn incoming_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
}

fn new_request_id() -> String {
    format!("req-{}", services::uuid::new_record_id())
}
