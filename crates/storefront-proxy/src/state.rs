//! Application state management

use std::{sync::Arc, time::{Duration, Instant}};

use storefront_client::{BackendClient, InMemorySessionProvider};
use storefront_core::{Config, context_error, context_error::Result};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Client used to relay requests upstream
    pub http: reqwest::Client,
    /// Typed client for the credential exchange, absent without a base URL
    pub backend: Option<BackendClient>,
    /// When the server started
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state
    ///
    /// A missing base URL is not an error here; the relay answers every
    /// request with a 500 until one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.backend.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| context_error!("Failed to build HTTP client: {}", e))?;

        // the relay never holds a session of its own
        let backend = match config.backend.require_base_url() {
            Ok(_) => Some(BackendClient::new(
                &config.backend,
                Arc::new(InMemorySessionProvider::new()),
            )?),
            Err(_) => None,
        };

        Ok(Self {
            config,
            http,
            backend,
            started_at: Instant::now(),
        })
    }

    /// Configured backend base URL
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no base URL is set.
    pub fn base_url(&self) -> storefront_core::Result<&str> {
        self.config.backend.require_base_url()
    }

    /// Seconds since the server started
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_state_without_base_url() {
        let state = AppState::new(Config::default()).unwrap();
        assert!(state.backend.is_none());
        assert_eq!(
            state.base_url().unwrap_err().to_string(),
            "Configuration error: BASE_URL is not defined"
        );
    }

    #[test]
    fn test_state_with_base_url() {
        let mut config = Config::default();
        config.backend.base_url = Some("http://localhost:4000/api/v1/".to_string());

        let state = AppState::new(config).unwrap();
        assert!(state.backend.is_some());
        assert_eq!(state.base_url().unwrap(), "http://localhost:4000/api/v1");
    }
}
