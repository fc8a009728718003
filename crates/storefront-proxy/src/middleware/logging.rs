//! Request logging middleware for tracing

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, warn};

/// Header carrying the request identifier
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Wrap each request in a span carrying method, URI and request id
///
/// The id is taken from `X-Request-ID` when the caller sent one and echoed
/// back on the response.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(generate_request_id, String::from);

    let span = tracing::info_span!(
        "request",
        method = %method,
        uri = %uri,
        request_id = %request_id,
    );

    let mut response = async move {
        let response = next.run(request).await;
        let elapsed = start_time.elapsed();
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!(status = %status, elapsed = ?elapsed, "Request completed with error");
        } else {
            info!(status = %status, elapsed = ?elapsed, "Request completed");
        }

        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Generate a unique request ID for tracing
fn generate_request_id() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    format!("req_{:016x}", rng.r#gen::<u64>())
}
