//! JSON body extractor that validates before the handler runs

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::middleware::ApiError;

/// Parsed and validated JSON body
///
/// Malformed JSON, a missing content type and failed validation all answer
/// `400 { "error": ... }` instead of axum's plaintext rejections.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection.body_text(), "Rejected request body");
                ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
            })?;

        data.validate().map_err(|errors| {
            let err = storefront_core::Error::from(errors);
            debug!(error = %err, "Request body failed validation");
            ApiError::bad_request(err.to_string())
        })?;

        Ok(Self(data))
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
