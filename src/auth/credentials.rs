//! The credential record persisted as a single secret.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

/// A JIRA credential set.
///
/// Exactly one value exists in storage at a time, serialized as one JSON
/// secret. Mutation is full replacement only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// The JIRA instance URL: https, no trailing slash.
    pub base_url: String,
    /// The user's email address.
    pub email: String,
    /// The API token.
    pub api_token: String,
}

impl Credentials {
    /// Create a credential set, normalizing the base URL.
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            email: email.to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// The complete Basic auth header value, `base64(email:token)`.
    pub fn auth_header(&self) -> String {
        let raw = format!("{}:{}", self.email, self.api_token);
        format!("Basic {}", BASE64.encode(raw.as_bytes()))
    }

    /// The REST API root for this instance.
    pub fn api_root(&self) -> String {
        format!("{}/rest/api/3", self.base_url)
    }
}

/// Strip one trailing slash from the base URL.
fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}
