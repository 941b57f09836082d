//! Error types for the credential lifecycle.

use thiserror::Error;

/// Errors that can occur while obtaining, validating or storing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Interactive collection was aborted or produced invalid input.
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    /// The remote service rejected the credentials (HTTP 401).
    #[error("Invalid credentials: check your email and API token")]
    InvalidCredentials,

    /// The remote service denied access (HTTP 403).
    #[error("Permission denied: the token is valid but lacks access")]
    PermissionDenied,

    /// Any other HTTP error during validation.
    #[error("Validation failed with HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// The instance could not be reached at all (DNS or connection failure).
    #[error("Cannot reach the JIRA instance: {0}")]
    Unreachable(String),

    /// Any other transport error during the validation call.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The secret or state store failed.
    #[error("Secure storage error: {0}")]
    Storage(String),
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_names_field() {
        let err = AuthError::MissingInput("base URL");
        assert_eq!(err.to_string(), "Missing input: base URL");
    }

    #[test]
    fn test_remote_carries_status() {
        let err = AuthError::Remote {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
