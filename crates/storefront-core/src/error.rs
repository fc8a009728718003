//! Error types for the storefront admin toolkit

use std::{error::Error as StdError, fmt};

/// Main error type for the storefront admin toolkit
///
/// The variants map onto three user-facing outcomes: authentication
/// failures send the user back to the login entry point, validation
/// failures are shown next to the offending field, and everything else
/// becomes a transient notice over an empty or stale view.
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Transport-level failure talking to the backend
    Network(String),

    /// Backend answered with a non-success status
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Credential exchange failed
    Authentication(String),

    /// No session is established
    Unauthenticated,

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the caller should send the user back to the login entry point
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication(_) | Self::Unauthenticated)
    }

    /// Whether the error belongs next to a form field
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status reported by the backend, if any
    #[must_use]
    pub const fn backend_status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::Backend { status, message } => {
                write!(f, "Backend returned {status}: {message}")
            }
            Self::Authentication(msg) => write!(f, "Authentication failed: {msg}"),
            Self::Unauthenticated => write!(f, "Not authenticated"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields.into_iter().next().map_or_else(
            || Self::validation("request", "invalid input"),
            |(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map_or_else(|| "is invalid".to_string(), ToString::to_string);
                Self::validation(field.to_string(), message)
            },
        )
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::uninlined_format_args,
    clippy::match_same_arms
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        match app_error {
            Error::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }

        assert!(format!("{}", app_error).contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation("price", "Valid price is required");

        assert_eq!(
            format!("{}", error),
            "Validation error: price - Valid price is required"
        );
        assert!(error.is_validation());
        assert!(!error.is_auth_failure());
    }

    #[test]
    fn test_backend_error() {
        let error = Error::Backend {
            status: 502,
            message: "Bad Gateway".to_string(),
        };

        assert_eq!(format!("{}", error), "Backend returned 502: Bad Gateway");
        assert_eq!(error.backend_status(), Some(502));
    }

    #[test]
    fn test_authentication_errors_redirect_to_login() {
        assert!(Error::Authentication("bad credentials".to_string()).is_auth_failure());
        assert!(Error::Unauthenticated.is_auth_failure());
        assert!(!Error::Network("reset".to_string()).is_auth_failure());
    }

    #[test]
    fn test_unauthorized_backend_status_is_not_an_auth_failure() {
        // an invalidated token surfaces as a generic fetch failure
        let error = Error::Backend {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(!error.is_auth_failure());
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#).unwrap_err();
        let app_error = Error::from(json_error);

        match app_error {
            Error::Serialization(_) => {}
            _ => panic!("Expected Serialization error variant"),
        }
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_error_source_for_message_errors() {
        assert!(Error::Unauthenticated.source().is_none());
        assert!(Error::Other("x".to_string()).source().is_none());
        assert!(
            Error::NotFound {
                resource: "product 1".to_string()
            }
            .source()
            .is_none()
        );
    }

    #[test]
    fn test_validation_errors_conversion_picks_first_field() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        errors.add(
            "password",
            ValidationError::new("length").with_message("Password is required".into()),
        );
        errors.add(
            "email",
            ValidationError::new("length").with_message("Email is required".into()),
        );

        let error = Error::from(errors);
        assert_eq!(format!("{}", error), "Validation error: email - Email is required");
    }
}
