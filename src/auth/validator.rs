//! Remote credential validation.
//!
//! One authenticated GET against the current-user endpoint with a bounded
//! timeout. Validation failures are classified but never retried; retry
//! belongs to the API client, not here.

use std::time::Duration;

use reqwest::{header, StatusCode};
use tracing::debug;

use super::credentials::Credentials;
use super::error::{AuthError, Result};
use crate::api::types::CurrentUser;

/// Validate a credential set against the remote instance.
///
/// Success requires HTTP 200 and a response body carrying a non-empty email
/// address.
pub async fn validate(credentials: &Credentials, timeout: Duration) -> Result<CurrentUser> {
    debug!(base_url = %credentials.base_url, "Validating credentials");

    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/myself", credentials.api_root()))
        .header(header::AUTHORIZATION, credentials.auth_header())
        .header(header::ACCEPT, "application/json")
        .timeout(timeout)
        .send()
        .await
        .map_err(classify_transport_error)?;

    let status = response.status();
    match status {
        StatusCode::OK => {
            let user: CurrentUser = response
                .json()
                .await
                .map_err(|e| AuthError::ValidationFailed(format!("unreadable response: {}", e)))?;
            if user.email_address.is_empty() {
                return Err(AuthError::ValidationFailed(
                    "current-user response carried no email address".to_string(),
                ));
            }
            debug!(user = %user.display_name, "Credentials validated");
            Ok(user)
        }
        StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
        StatusCode::FORBIDDEN => Err(AuthError::PermissionDenied),
        other => Err(AuthError::Remote {
            status: other.as_u16(),
            message: other
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        }),
    }
}

fn classify_transport_error(err: reqwest::Error) -> AuthError {
    if err.is_connect() {
        AuthError::Unreachable(err.to_string())
    } else {
        AuthError::ValidationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(base_url: &str) -> Credentials {
        Credentials::new(base_url, "user@example.com", "token12345")
    }

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_validate_success_requires_email() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/myself")
            .with_status(200)
            .with_body(
                r#"{"accountId": "abc", "displayName": "Test User", "emailAddress": "user@example.com"}"#,
            )
            .create_async()
            .await;

        let user = validate(&creds(&server.url()), TIMEOUT).await.unwrap();
        assert_eq!(user.display_name, "Test User");
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_email() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/myself")
            .with_status(200)
            .with_body(r#"{"accountId": "abc", "displayName": "Hidden User"}"#)
            .create_async()
            .await;

        let err = validate(&creds(&server.url()), TIMEOUT).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_validate_401_is_invalid_credentials() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/myself")
            .with_status(401)
            .create_async()
            .await;

        let err = validate(&creds(&server.url()), TIMEOUT).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_validate_403_is_permission_denied() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/myself")
            .with_status(403)
            .create_async()
            .await;

        let err = validate(&creds(&server.url()), TIMEOUT).await.unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_validate_other_status_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/myself")
            .with_status(503)
            .create_async()
            .await;

        let err = validate(&creds(&server.url()), TIMEOUT).await.unwrap_err();
        match err {
            AuthError::Remote { status, .. } => assert_eq!(status, 503),
            other => panic!("Expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_connection_refused_is_unreachable() {
        // Nothing listens on this port.
        let err = validate(&creds("http://127.0.0.1:1"), TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unreachable(_)));
    }
}
