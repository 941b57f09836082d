//! Centralized error types for SideJira.
//!
//! Aggregates the per-module error enums and maps each to a readable
//! message suitable for the notification surface.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::auth::error::AuthError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication and credential lifecycle errors.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    ///
    /// Suitable for the notification surface, without stack traces.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(e) => match e {
                AuthError::MissingInput(field) => {
                    format!("Sign-in cancelled: no valid {} was provided.", field)
                }
                AuthError::InvalidCredentials => {
                    "Authentication failed. Please check your email and API token.".to_string()
                }
                AuthError::PermissionDenied => {
                    "Access denied. Your token is valid but lacks access.".to_string()
                }
                AuthError::Remote { status, message } => {
                    format!("JIRA rejected the sign-in check (HTTP {}): {}", status, message)
                }
                AuthError::Unreachable(_) => {
                    "Could not reach the JIRA instance. Check the URL and your network.".to_string()
                }
                AuthError::ValidationFailed(msg) => {
                    format!("Could not verify your credentials: {}", msg)
                }
                AuthError::Storage(_) => {
                    "Could not access secure storage. Please sign in again.".to_string()
                }
            },
            AppError::Api(e) => match e {
                ApiError::NotAuthenticated => {
                    "Not signed in. Run 'sidejira login' first.".to_string()
                }
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your email and API token.".to_string()
                }
                ApiError::Forbidden => {
                    "Access denied. You don't have permission for this resource.".to_string()
                }
                ApiError::Remote { status, message } => {
                    format!("JIRA error (HTTP {}): {}", status, message)
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from JIRA. Please try again.".to_string()
                }
                ApiError::NoAccessibleProjects => {
                    "No accessible projects were found to create the issue in.".to_string()
                }
            },
            AppError::Config(e) => format!("Configuration error: {}", e),
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_auth_error() {
        let err: AppError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let err: AppError = ApiError::NotAuthenticated.into();
        assert!(matches!(err, AppError::Api(ApiError::NotAuthenticated)));
    }

    #[test]
    fn test_user_message_missing_input_names_field() {
        let err = AppError::Auth(AuthError::MissingInput("base URL"));
        assert!(err.user_message().contains("base URL"));
    }

    #[test]
    fn test_user_message_not_authenticated_suggests_login() {
        let err = AppError::Api(ApiError::NotAuthenticated);
        assert!(err.user_message().contains("login"));
    }

    #[test]
    fn test_user_message_remote_carries_status() {
        let err = AppError::Api(ApiError::Remote {
            status: 502,
            message: "Bad Gateway".to_string(),
        });
        let msg = err.user_message();
        assert!(msg.contains("502"));
        assert!(msg.contains("Bad Gateway"));
    }

    #[test]
    fn test_user_message_no_accessible_projects() {
        let err = AppError::Api(ApiError::NoAccessibleProjects);
        assert!(err.user_message().contains("projects"));
    }
}
