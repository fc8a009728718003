//! HTTP client for the storefront backend

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use storefront_core::{
    Error, Result,
    config::BackendConfig,
    types::{
        Category, Customer, LoginRequest, LoginResponse, Order, Product, SlideKind,
        SlideSelection, Vendor, parse_selection_ids,
    },
    utils::{join_url, slug_matches},
};
use tracing::{debug, warn};
use validator::Validate;

use crate::session::{CredentialExchange, SessionProvider};

const PRODUCTS_PATH: &str = "all/products";
const CATEGORIES_PATH: &str = "all/category";

/// Typed client for the backend endpoints
///
/// The bearer token is read from the injected [`SessionProvider`] on every
/// request. Failures are never retried and a 401 is reported like any other
/// non-success status.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    login_path: String,
    orders_path: String,
    customers_path: String,
    vendors_path: String,
    provider: Arc<dyn SessionProvider>,
}

impl BackendClient {
    /// Create a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no base URL is configured and a
    /// network error when the HTTP client cannot be built.
    pub fn new(config: &BackendConfig, provider: Arc<dyn SessionProvider>) -> Result<Self> {
        let base_url = config.require_base_url()?.to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            login_path: config.login_path.clone(),
            orders_path: config.orders_path.clone(),
            customers_path: config.customers_path.clone(),
            vendors_path: config.vendors_path.clone(),
            provider,
        })
    }

    /// Base URL every path is appended to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session provider the client reads its token from
    #[must_use]
    pub fn provider(&self) -> Arc<dyn SessionProvider> {
        Arc::clone(&self.provider)
    }

    /// Attach the session token as a bearer credential, if there is one
    ///
    /// Without a session the request goes out unauthenticated and the
    /// backend is expected to reject it.
    #[must_use]
    pub fn attach_authorization(&self, request: RequestBuilder) -> RequestBuilder {
        match self.provider.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, &[path])
    }

    /// Exchange credentials for a token
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty credentials, otherwise any
    /// transport, status or parse failure of the login call.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        request.validate()?;

        let url = self.url(&self.login_path);
        debug!(url = %url, "Sending login request");
        let response = self.client.post(&url).json(request).send().await;
        read_json(response).await
    }

    /// GET `path` and decode the JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not the expected JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .attach_authorization(self.client.get(&url))
            .send()
            .await;
        read_json(response).await
    }

    /// POST `body` as JSON to `path` and decode the JSON answer
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not the expected JSON.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .attach_authorization(self.client.post(&url))
            .json(body)
            .send()
            .await;
        read_json(response).await
    }

    /// PUT `body` as JSON to `path` and decode the JSON answer
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not the expected JSON.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        let response = self
            .attach_authorization(self.client.put(&url))
            .json(body)
            .send()
            .await;
        read_json(response).await
    }

    /// Every product in the catalogue
    ///
    /// # Errors
    ///
    /// See [`BackendClient::get_json`].
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.get_collection(PRODUCTS_PATH).await
    }

    /// Every product category
    ///
    /// # Errors
    ///
    /// See [`BackendClient::get_json`].
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get_collection(CATEGORIES_PATH).await
    }

    /// One product by identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] on a 404, otherwise see
    /// [`BackendClient::get_json`].
    pub async fn get_product(&self, product_id: &str) -> Result<Product> {
        self.get_json(&format!("product/{product_id}"))
            .await
            .map_err(|err| match err.backend_status() {
                Some(404) => Error::NotFound {
                    resource: format!("product {product_id}"),
                },
                _ => err,
            })
    }

    /// Replace a product's fields on behalf of `admin_id`
    ///
    /// # Errors
    ///
    /// See [`BackendClient::put_json`].
    pub async fn update_product(
        &self,
        admin_id: &str,
        product_id: &str,
        product: &Product,
    ) -> Result<Value> {
        self.put_json(&format!("product/{admin_id}/{product_id}"), product)
            .await
    }

    /// Every order
    ///
    /// # Errors
    ///
    /// See [`BackendClient::get_json`].
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.get_collection(&self.orders_path).await
    }

    /// Every registered customer
    ///
    /// # Errors
    ///
    /// See [`BackendClient::get_json`].
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get_collection(&self.customers_path).await
    }

    /// The customer whose detail page `slug` addresses
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no customer's name matches the slug,
    /// otherwise see [`BackendClient::get_json`].
    pub async fn find_customer(&self, slug: &str) -> Result<Customer> {
        self.list_customers()
            .await?
            .into_iter()
            .find(|customer| slug_matches(slug, &customer.name))
            .ok_or_else(|| Error::NotFound {
                resource: format!("customer {slug}"),
            })
    }

    /// Every vendor
    ///
    /// # Errors
    ///
    /// See [`BackendClient::get_json`].
    pub async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        self.get_collection(&self.vendors_path).await
    }

    /// Product identifiers currently on a slide
    ///
    /// # Errors
    ///
    /// See [`BackendClient::get_json`].
    pub async fn slide_selection(&self, kind: SlideKind) -> Result<Vec<String>> {
        let value: Value = self.get_json(kind.path()).await?;
        Ok(parse_selection_ids(&value))
    }

    /// Replace the products on a slide
    ///
    /// # Errors
    ///
    /// See [`BackendClient::post_json`].
    pub async fn save_slide_selection(&self, kind: SlideKind, product_ids: &[String]) -> Result<Value> {
        let body = SlideSelection {
            product_ids: product_ids.to_vec(),
        };
        self.post_json(kind.path(), &body).await
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let value: Value = self.get_json(path).await?;
        decode_collection(value)
    }
}

#[async_trait]
impl CredentialExchange for BackendClient {
    async fn exchange(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.login(request).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: std::result::Result<Response, reqwest::Error>,
) -> Result<T> {
    let response = response.map_err(|e| Error::Network(e.to_string()))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body);
        let message = if text.trim().is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            text.into_owned()
        };
        warn!(status = status.as_u16(), message = %message, "Backend returned an error");
        return Err(Error::Backend {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Accept a bare array or an object wrapping exactly one array
fn decode_collection<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    let array = match value {
        Value::Array(_) => value,
        Value::Object(map) => {
            let mut arrays = map.into_iter().map(|(_, v)| v).filter(Value::is_array);
            match (arrays.next(), arrays.next()) {
                (Some(array), None) => array,
                (None, _) => {
                    return Err(Error::Other("response does not contain a list".to_string()));
                }
                (Some(_), Some(_)) => {
                    return Err(Error::Other("response contains more than one list".to_string()));
                }
            }
        }
        other => {
            return Err(Error::Other(format!("expected a list, got {other}")));
        }
    };
    Ok(serde_json::from_value(array)?)
}
