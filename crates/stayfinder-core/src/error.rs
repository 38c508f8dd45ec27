//! Error types for the stayfinder client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire stayfinder client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StayError {
    /// Gateway unreachable, request timed out, or the backend answered non-2xx
    #[error("Network failure: {message}")]
    Network {
        /// Short transport-level description
        message: String,
        /// User-displayable message extracted from the backend error body, if any
        server_message: Option<String>,
    },

    /// Response body had an unexpected shape (e.g. HTML where JSON was expected)
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Operation requires a session that does not exist
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Federated identity credential could not be parsed
    #[error("Credential decode error: {0}")]
    Decode(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StayError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error with no backend-supplied message
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            server_message: None,
        }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is a MalformedResponse error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    /// Check if this is a NotAuthenticated error
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if this is a Decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns the backend-supplied error message, if the backend sent one.
    ///
    /// Only `Network` errors built from a JSON error body carry one; every
    /// other variant returns `None` so callers fall back to their own
    /// user-facing message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Network {
                server_message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StayError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for infrastructure boundaries)
impl From<anyhow::Error> for StayError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, StayError>`.
pub type Result<T> = std::result::Result<T, StayError>;
