//! Local relay server for the storefront admin dashboard
//!
//! Forwards dashboard requests to the storefront backend with the caller's
//! bearer credential, and performs the credential exchange server side.

#![forbid(unsafe_code)]

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::Router;
use std::sync::Arc;
use storefront_core::{Config, context_error::Result};

/// Build the relay router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the application state cannot be created.
pub fn build_router(config: Config) -> Result<Router> {
    let cors_origins = config.server.cors_origins.clone();
    let state = Arc::new(AppState::new(config)?);

    if state.base_url().is_err() {
        tracing::warn!("BASE_URL is not defined; relay requests will fail until it is set");
    }

    Ok(routes::build_router(&cors_origins).with_state(state))
}
