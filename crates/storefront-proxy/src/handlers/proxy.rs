//! Generic passthrough to the storefront backend
//!
//! `GET|POST /api/proxy?path=P&adminId=A` is forwarded to `{base}/P[/A]`
//! and the backend's JSON comes back verbatim.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use storefront_core::{config::BASE_URL_ENV, utils::join_url};
use tracing::{debug, error, warn};

use crate::{
    middleware::{ApiError, auth::ForwardedAuthorization},
    state::AppState,
};

/// Path whose listing is global, so `adminId` is never appended on GET
pub const CATEGORY_PATH: &str = "all/category";

const FETCH_FAILED: &str = "An error occurred while fetching data";
const POST_FAILED: &str = "An error occurred while adding the product";

/// Query parameters of the relay endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyQuery {
    /// Backend path, without leading slash
    pub path: Option<String>,
    /// Administrator identifier appended as a trailing segment
    #[serde(rename = "adminId")]
    pub admin_id: Option<String>,
}

/// Which requests get `adminId` appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    /// GET: appended unless the path is the category listing
    Get,
    /// POST: appended whenever present
    Post,
}

impl ProxyQuery {
    /// Upstream URL for this query
    ///
    /// # Errors
    ///
    /// Returns a 400 error when `path` is missing or blank.
    pub fn target_url(&self, base: &str, relay: Relay) -> Result<String, ApiError> {
        let path = self
            .path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("path query parameter is required"))?;

        let admin_id = self
            .admin_id
            .as_deref()
            .filter(|_| relay == Relay::Post || path.trim_matches('/') != CATEGORY_PATH)
            .unwrap_or("");

        Ok(join_url(base, &[path, admin_id]))
    }
}

fn base_url(state: &AppState) -> Result<&str, ApiError> {
    state.base_url().map_err(|e| {
        error!(error = %e, "Relay is not configured");
        ApiError::internal(format!("{BASE_URL_ENV} is not defined"))
    })
}

/// Relay a GET request
///
/// # Errors
///
/// Returns 400 without `path`, and 500 when the base URL is unset or the
/// backend cannot be reached or answers with something other than JSON.
pub async fn proxy_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
    auth: ForwardedAuthorization,
) -> Result<Json<Value>, ApiError> {
    let base = base_url(&state)?;
    let url = query.target_url(base, Relay::Get)?;
    debug!(url = %url, bearer = auth.bearer_token().is_some(), "Relaying GET");

    let request = auth.apply(state.http.get(&url));
    relay(request, &url, FETCH_FAILED).await
}

/// Relay a POST request with its JSON body
///
/// The body is parsed only after the base URL and path are known, so an
/// unconfigured relay answers the same way whatever the caller sent.
///
/// # Errors
///
/// Returns 400 without `path`, and 500 when the base URL is unset, the body
/// is not JSON, or the backend cannot be reached or answers with something
/// other than JSON.
pub async fn proxy_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
    auth: ForwardedAuthorization,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let base = base_url(&state)?;
    let url = query.target_url(base, Relay::Post)?;
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(url = %url, error = %e, "Request body is not JSON");
        ApiError::internal(POST_FAILED)
    })?;
    debug!(url = %url, bearer = auth.bearer_token().is_some(), "Relaying POST");

    let request = auth.apply(state.http.post(&url)).json(&body);
    relay(request, &url, POST_FAILED).await
}

async fn relay(
    request: reqwest::RequestBuilder,
    url: &str,
    failure: &'static str,
) -> Result<Json<Value>, ApiError> {
    let response = request.send().await.map_err(|e| {
        error!(url, error = %e, "Backend request failed");
        ApiError::internal(failure)
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!(url, status = status.as_u16(), "Backend answered with an error status");
    }

    let data = response.json::<Value>().await.map_err(|e| {
        error!(url, error = %e, "Backend returned a non-JSON body");
        ApiError::internal(failure)
    })?;

    Ok(Json(data))
}
