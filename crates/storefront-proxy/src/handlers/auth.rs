//! Server-side credential exchange

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use storefront_client::Session;
use storefront_core::{
    config::BASE_URL_ENV,
    types::{AdminUser, LoginRequest},
};
use tracing::{info, warn};

use crate::{extractors::ValidatedJson, middleware::ApiError, state::AppState};

/// Successful login: the identity plus the backend token
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Logged-in administrator
    pub user: AdminUser,
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Exchange credentials for a backend token
///
/// # Errors
///
/// Returns 400 for a malformed body or empty credentials, 500 when no
/// backend is configured and 401 for any failed exchange.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    let backend = state
        .backend
        .as_ref()
        .ok_or_else(|| ApiError::internal(format!("{BASE_URL_ENV} is not defined")))?;

    let session = backend
        .login(&request)
        .await
        .and_then(Session::try_from)
        .map_err(|e| {
            warn!(email = %request.email, error = %e, "Login rejected");
            ApiError::unauthorized("Invalid credentials")
        })?;

    info!(user_id = %session.user_id, "Login succeeded");
    Ok(Json(LoginResult {
        user: session.user(),
        token: session.token,
    }))
}
