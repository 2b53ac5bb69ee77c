//! Error types for the GymFlow client core.

use thiserror::Error;

use crate::validation::ValidationError;

/// User-facing message attached to every timeout failure.
pub const TIMEOUT_MESSAGE: &str =
    "The request took too long to respond. Check your connection and try again.";

/// A shared error type for the entire GymFlow client.
///
/// Every external-interface adapter converts its failures into this type, so
/// services and screens only ever branch on one shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GymError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Structured error returned by the remote data service
    #[error("Remote error: {message}")]
    Remote {
        message: String,
        code: Option<String>,
    },

    /// Transport failure (connection refused, DNS, aborted request)
    #[error("Network error: {0}")]
    Network(String),

    /// The call exceeded its deadline and was aborted
    #[error("{message}")]
    Timeout { message: String, after_ms: u64 },

    /// The call was abandoned because the owning context was torn down
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Local input validation failure (never reaches the network)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Identity provider / session failure
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Caller lacks the role required for the operation
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Operation cannot start because a required condition does not hold
    #[error("{0}")]
    Precondition(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GymError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Remote error
    pub fn remote(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Remote {
            message: message.into(),
            code,
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Timeout error carrying the standard user-facing message
    pub fn timeout(after_ms: u64) -> Self {
        Self::Timeout {
            message: TIMEOUT_MESSAGE.to_string(),
            after_ms,
        }
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Permission error
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Creates a Precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
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

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Timeouts are classified as network failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether a user-triggered retry of the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout { .. } | Self::Remote { .. }
        )
    }

    /// Message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Timeout { message, .. } => message.clone(),
            Self::Network(_) => "Unable to reach the server. Check your connection.".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Precondition(message) | Self::Permission(message) | Self::Auth(message) => {
                message.clone()
            }
            Self::NotFound { entity_type, .. } => format!("The requested {entity_type} no longer exists."),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GymError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for GymError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GymError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GymError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used by binaries wiring things together)
impl From<anyhow::Error> for GymError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, GymError>`.
pub type Result<T> = std::result::Result<T, GymError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_network_kind() {
        let err = GymError::timeout(100);
        assert!(err.is_timeout());
        assert!(err.is_network());
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), TIMEOUT_MESSAGE);
    }

    #[test]
    fn test_validation_is_not_retryable() {
        let err: GymError = ValidationError::Required { field: "email" }.into();
        assert!(err.is_validation());
        assert!(!err.is_retryable());
        assert!(!err.is_network());
    }

    #[test]
    fn test_remote_user_message_passes_through() {
        let err = GymError::remote("Student already registered", Some("23505".into()));
        assert_eq!(err.user_message(), "Student already registered");
    }
}
