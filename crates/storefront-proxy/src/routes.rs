//! Route definitions

use crate::{handlers, middleware::logging::request_logging_middleware, state::AppState};
use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Relay and login routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/proxy",
            get(handlers::proxy::proxy_get).post(handlers::proxy::proxy_post),
        )
        .route("/api/auth/login", post(handlers::auth::login))
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// CORS policy for the configured origins; `*` allows any origin
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Combine all routes into a single router
pub fn build_router(cors_origins: &[String]) -> Router<Arc<AppState>> {
    Router::new()
        .merge(api_routes())
        .merge(health_routes())
        .fallback(not_found_handler)
        .layer(axum::middleware::from_fn(request_logging_middleware))
        .layer(cors_layer(cors_origins))
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({
            "error": "The requested endpoint does not exist"
        })),
    )
}
