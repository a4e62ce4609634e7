//! Error types for the Mealie SDK.
//!
//! Every public operation returns [`Result<T>`], whose error side is a
//! [`MealieError`]. Callers are expected to match on the variant they care
//! about:
//!
//! - [`MealieError::Authentication`] - credentials rejected or expired
//! - [`MealieError::NotFound`] - the addressed resource does not exist
//! - [`MealieError::Validation`] - a 2xx response body did not match the expected record
//! - [`MealieError::Timeout`] / [`MealieError::Network`] - transport failures after retries
//! - [`MealieError::Api`] - any other non-2xx response

use thiserror::Error;

/// Result alias used throughout the SDK.
pub type Result<T> = std::result::Result<T, MealieError>;

#[derive(Debug, Error)]
pub enum MealieError {
    /// Credentials were rejected, the login response was unusable, or a
    /// refreshed token was rejected again.
    #[error("Authentication failed: {message}")]
    Authentication { status: Option<u16>, message: String },

    /// The server answered 404 for the addressed resource.
    #[error("{resource_type} '{resource_id}' not found")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// A successful response whose body could not be decoded into the
    /// expected record.
    #[error("Invalid response payload for {context}: {source}")]
    Validation {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("Network error after {attempts} attempt(s): {source}")]
    Network {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Any other non-2xx status, including 5xx responses once the retry
    /// budget is spent.
    #[error("Mealie API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MealieError {
    /// HTTP status carried by the error, when one was observed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MealieError::Authentication { status, .. } => *status,
            MealieError::NotFound { .. } => Some(404),
            MealieError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the transport would retry a request that failed this way.
    pub fn is_retryable(&self) -> bool {
        match self {
            MealieError::Timeout { .. } | MealieError::Network { .. } => true,
            MealieError::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MealieError::NotFound { .. })
    }

    /// Re-labels a generic 404 with the resource family and key the caller
    /// asked for. Other errors pass through untouched.
    pub(crate) fn for_resource(self, resource_type: &str, resource_id: &str) -> Self {
        match self {
            MealieError::NotFound { .. } => MealieError::NotFound {
                resource_type: resource_type.to_string(),
                resource_id: resource_id.to_string(),
            },
            other => other,
        }
    }
}

/// Statuses treated as transient by the transport.
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}
