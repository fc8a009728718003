//! Session bridge: credential exchange and the single source of the bearer token
//!
//! Every component that talks to the backend receives an
//! `Arc<dyn SessionProvider>` instead of reading the token from wherever it
//! happens to be stored. The [`SessionBridge`] drives the
//! `Unauthenticated -> Authenticating -> Authenticated` state machine on top
//! of that provider.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use storefront_core::{
    Error, Result,
    types::{AdminUser, LoginRequest, LoginResponse},
    utils::require_present,
};
use tracing::{debug, info, warn};

/// Authenticated identity held for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Backend identifier of the administrator
    pub user_id: String,
    /// Name shown in the navigation bar
    pub display_name: String,
    /// Email address used to log in
    pub email: String,
    /// Opaque bearer token, never empty
    pub token: String,
}

impl Session {
    /// Identity part of the session
    #[must_use]
    pub fn user(&self) -> AdminUser {
        AdminUser {
            id: self.user_id.clone(),
            name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl TryFrom<LoginResponse> for Session {
    type Error = Error;

    fn try_from(response: LoginResponse) -> Result<Self> {
        if response.token.trim().is_empty() {
            return Err(Error::Authentication(
                "login response did not include a token".to_string(),
            ));
        }

        Ok(Self {
            user_id: response.user.id,
            display_name: response.user.name,
            email: response.user.email,
            token: response.token,
        })
    }
}

/// Where the session state machine currently is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No session; protected pages redirect to login
    #[default]
    Unauthenticated,
    /// A credential exchange is in flight
    Authenticating,
    /// A token is held
    Authenticated(Session),
}

impl SessionStatus {
    /// Whether a token is held
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Injected source of the current session
pub trait SessionProvider: Send + Sync + std::fmt::Debug {
    /// Current state
    fn status(&self) -> SessionStatus;

    /// Current session, if authenticated
    fn session(&self) -> Option<Session> {
        match self.status() {
            SessionStatus::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Bearer token, if authenticated
    fn token(&self) -> Option<String> {
        self.session().map(|session| session.token)
    }

    /// Enter the `Authenticating` state
    fn begin_authentication(&self);

    /// Store a freshly established session
    fn establish(&self, session: Session);

    /// Drop the session and return to `Unauthenticated`
    fn clear(&self);
}

/// Session provider that keeps the token in memory only
#[derive(Debug, Default)]
pub struct InMemorySessionProvider {
    status: RwLock<SessionStatus>,
}

impl InMemorySessionProvider {
    /// Create an unauthenticated provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that already holds `session`
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            status: RwLock::new(SessionStatus::Authenticated(session)),
        }
    }
}

impl SessionProvider for InMemorySessionProvider {
    fn status(&self) -> SessionStatus {
        self.status.read().clone()
    }

    fn token(&self) -> Option<String> {
        match &*self.status.read() {
            SessionStatus::Authenticated(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    fn begin_authentication(&self) {
        *self.status.write() = SessionStatus::Authenticating;
    }

    fn establish(&self, session: Session) {
        *self.status.write() = SessionStatus::Authenticated(session);
    }

    fn clear(&self) {
        *self.status.write() = SessionStatus::Unauthenticated;
    }
}

/// Backend call that trades credentials for a token
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Perform one login call
    async fn exchange(&self, request: &LoginRequest) -> Result<LoginResponse>;
}

/// Drives the session state machine
#[derive(Clone)]
pub struct SessionBridge {
    provider: Arc<dyn SessionProvider>,
    exchange: Arc<dyn CredentialExchange>,
}

impl std::fmt::Debug for SessionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBridge")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl SessionBridge {
    /// Create a bridge over `provider` using `exchange` for logins
    pub fn new(provider: Arc<dyn SessionProvider>, exchange: Arc<dyn CredentialExchange>) -> Self {
        Self { provider, exchange }
    }

    /// The provider this bridge writes to
    #[must_use]
    pub fn provider(&self) -> Arc<dyn SessionProvider> {
        Arc::clone(&self.provider)
    }

    /// Exchange credentials for a session
    ///
    /// Empty credentials are rejected before any call is made. Otherwise
    /// exactly one login call is issued; on failure the provider is left
    /// unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty credentials and an
    /// authentication error for any failed exchange.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
        let email = require_present("email", email)?;
        if password.is_empty() {
            return Err(Error::validation("password", "Password is required"));
        }

        self.provider.begin_authentication();
        debug!(email, "Exchanging credentials");

        let request = LoginRequest::new(email, password);
        let outcome = match self.exchange.exchange(&request).await {
            Ok(response) => Session::try_from(response),
            Err(err) => Err(Error::Authentication(err.to_string())),
        };

        match outcome {
            Ok(session) => {
                info!(user_id = %session.user_id, "Session established");
                self.provider.establish(session.clone());
                Ok(session)
            }
            Err(err) => {
                warn!(email, error = %err, "Authentication failed");
                self.provider.clear();
                Err(err)
            }
        }
    }

    /// Drop the current session
    pub fn logout(&self) {
        if self.provider.status().is_authenticated() {
            info!("Session closed");
        }
        self.provider.clear();
    }

    /// Auth guard for protected operations
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no session is held; callers
    /// treat it as a redirect to the login entry point.
    pub fn require_session(&self) -> Result<Session> {
        self.provider.session().ok_or(Error::Unauthenticated)
    }

    /// React to a page that observed an unauthenticated status
    pub fn mark_unauthenticated(&self) {
        warn!("Unauthenticated status detected, dropping session");
        self.provider.clear();
    }
}
