//! Backend client and session bridge for the storefront admin toolkit
//!
//! The [`session::SessionBridge`] turns credentials into a [`session::Session`]
//! held by an injected [`session::SessionProvider`]; the
//! [`api_client::BackendClient`] reads the bearer token from that same
//! provider on every request. The remaining modules are the editing surfaces
//! built on top of the client.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod metrics;
pub mod product_form;
pub mod render;
pub mod session;
pub mod slides;

pub use api_client::BackendClient;
pub use session::{InMemorySessionProvider, Session, SessionBridge, SessionProvider, SessionStatus};

use std::sync::Arc;

use storefront_core::{Result, config::BackendConfig};

/// Wire a session provider, backend client and bridge together
///
/// # Errors
///
/// Returns an error if the backend client cannot be created.
pub fn connect(config: &BackendConfig) -> Result<(BackendClient, SessionBridge)> {
    let provider: Arc<dyn SessionProvider> = Arc::new(InMemorySessionProvider::new());
    let client = BackendClient::new(config, Arc::clone(&provider))?;
    let bridge = SessionBridge::new(provider, Arc::new(client.clone()));
    Ok((client, bridge))
}
