//! Domain Errors
//!
//! Error types for domain operations and for the store link.

use thiserror::Error;
use uuid::Uuid;

/// Failures while establishing or verifying the store link.
///
/// Cloneable so that a single connection attempt can hand the same outcome
/// to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Missing or unusable connection string. Not retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection timed out: {0}")]
    Timeout(String),

    /// Credentials rejected by the store. Will recur until configuration changes.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// DNS, socket, TLS and other network-level failures.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ConnectionError {
    /// Short machine-friendly label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionError::Configuration(_) => "configuration",
            ConnectionError::Timeout(_) => "timeout",
            ConnectionError::Auth(_) => "auth",
            ConnectionError::Transport(_) => "transport",
        }
    }

    /// Whether a later request may succeed without operator intervention.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ConnectionError::Configuration(_))
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_found_str<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(!ConnectionError::Configuration("missing".into()).is_retryable());
        assert!(ConnectionError::Timeout("slow".into()).is_retryable());
        assert!(ConnectionError::Auth("denied".into()).is_retryable());
        assert!(ConnectionError::Transport("dns".into()).is_retryable());
    }

    #[test]
    fn test_connection_error_converts_transparently() {
        let err: DomainError = ConnectionError::Auth("bad password".into()).into();
        assert_eq!(err.to_string(), "Authentication failed: bad password");
    }
}
