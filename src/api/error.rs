//! API error types for the JIRA client.

use thiserror::Error;

/// Errors that can occur when interacting with the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An operation was invoked before credentials were set.
    ///
    /// This is a programming error in the caller, not a runtime condition:
    /// the command layer must obtain credentials first.
    #[error("Not authenticated: set credentials before issuing requests")]
    NotAuthenticated,

    /// Authentication failed - invalid email or API token.
    #[error("Authentication failed: check your email and API token")]
    Unauthorized,

    /// Permission denied - user lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Any other HTTP error from the remote service.
    #[error("JIRA returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// No response from the server at all.
    #[error("Network error, check connectivity: {0}")]
    Network(String),

    /// The success response body could not be parsed.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Create-issue default-project resolution found no accessible projects.
    #[error("No accessible projects: cannot pick a default project for the new issue")]
    NoAccessibleProjects,
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an appropriate error from an HTTP status code and a shaped
    /// message extracted from the response body.
    pub fn from_status(status: reqwest::StatusCode, message: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            code => ApiError::Remote {
                status: code,
                message: message.to_string(),
            },
        }
    }

    /// Whether this error came from a client-side (4xx) HTTP failure.
    ///
    /// Client-side failures are never retried.
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::Unauthorized | ApiError::Forbidden | ApiError::NotAuthenticated => true,
            ApiError::Remote { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// The numeric HTTP status carried by this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::from_status(status, &err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_from_status_401() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "test");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_error_from_status_403() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, "test");
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn test_error_from_status_500_carries_status_and_message() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            _ => panic!("Expected Remote error"),
        }
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ApiError::Unauthorized.is_client_error());
        assert!(ApiError::Forbidden.is_client_error());
        assert!(ApiError::NotAuthenticated.is_client_error());
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, "x").is_client_error());
        assert!(ApiError::from_status(StatusCode::CONFLICT, "x").is_client_error());
        assert!(!ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "x").is_client_error());
        assert!(!ApiError::Network("down".to_string()).is_client_error());
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert_eq!(ApiError::Forbidden.status(), Some(403));
        assert_eq!(
            ApiError::Remote {
                status: 502,
                message: "bad gateway".to_string()
            }
            .status(),
            Some(502)
        );
        assert_eq!(ApiError::Network("x".to_string()).status(), None);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Unauthorized;
        assert_eq!(
            err.to_string(),
            "Authentication failed: check your email and API token"
        );

        let err = ApiError::Network("connection refused".to_string());
        assert!(err.to_string().contains("check connectivity"));
    }
}
