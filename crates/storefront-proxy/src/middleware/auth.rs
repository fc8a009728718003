//! Bearer credential extraction for relayed requests

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;

/// `Authorization` header of the incoming request, forwarded unchanged
///
/// The relay does not check the credential; the backend decides. A
/// missing or non-UTF-8 header yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedAuthorization(pub Option<HeaderValue>);

impl ForwardedAuthorization {
    /// Read the header from a request
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self(
            headers
                .get(AUTHORIZATION)
                .filter(|value| value.to_str().is_ok())
                .cloned(),
        )
    }

    /// Token of a `Bearer <token>` credential
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.0
            .as_ref()
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Attach the credential to an upstream request
    #[must_use]
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.0 {
            Some(value) => request.header(AUTHORIZATION, value.clone()),
            None => request,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ForwardedAuthorization
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
