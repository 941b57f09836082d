//! The credential lifecycle: prompt, validate, persist, revalidate, expire.
//!
//! Lifecycle: `Unauthenticated -> Authenticating -> Authenticated ->
//! (revalidation due) -> Revalidating -> {Authenticated | Unauthenticated}`;
//! an explicit clear also drops to `Unauthenticated`.
//!
//! Concurrent `authenticate` or overlapping revalidations are not guarded:
//! the host frontend serializes user-initiated flows, and this manager
//! inherits that assumption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use super::credentials::Credentials;
use super::error::{AuthError, Result};
use super::prompt::{self, CredentialInput, Prompter};
use super::store::{SecretStore, StateStore};
use super::validator;
use crate::context::{AppContext, Notifier};

/// Key under which the serialized credential secret lives.
const SECRET_KEY: &str = "sidejira.credentials";

/// Key under which the last-validated timestamp lives.
const LAST_VALIDATED_KEY: &str = "sidejira.lastValidatedAt";

/// How long a successful validation stays fresh.
const REVALIDATE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// Timeout for the explicit authenticate and silent revalidation calls.
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the non-destructive status probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Best-effort authentication status, produced by a non-destructive probe.
#[derive(Debug, Clone, Default)]
pub struct AuthStatus {
    /// Whether the stored credentials validated just now.
    pub authenticated: bool,
    /// The validated user's display name, when authenticated.
    pub user: Option<String>,
    /// The instance base URL, when authenticated.
    pub base_url: Option<String>,
}

/// Owns the single stored credential set and its lifecycle.
pub struct AuthManager<S: SecretStore, T: StateStore> {
    secrets: S,
    state: T,
    notifier: Arc<dyn Notifier>,
    authenticated: Arc<AtomicBool>,
}

impl<S: SecretStore, T: StateStore> AuthManager<S, T> {
    /// Create a manager over the given stores, observing the context's
    /// authenticated flag.
    pub fn new(secrets: S, state: T, context: &AppContext) -> Self {
        Self {
            secrets,
            state,
            notifier: Arc::clone(&context.notifier),
            authenticated: context.authenticated_flag(),
        }
    }

    /// Run the full interactive authentication flow.
    ///
    /// Collects base URL, email and token through the prompt pipeline,
    /// validates remotely, and persists only on success. A failed collection
    /// step or validation leaves storage untouched.
    pub async fn authenticate(&self, prompter: &dyn Prompter) -> Result<Credentials> {
        let input = prompt::collect(prompter)?;
        self.complete_authentication(input).await
    }

    async fn complete_authentication(&self, input: CredentialInput) -> Result<Credentials> {
        let credentials = Credentials::new(&input.base_url, &input.email, &input.api_token);

        let user = validator::validate(&credentials, VALIDATE_TIMEOUT).await?;

        let blob = serde_json::to_string(&credentials)
            .map_err(|e| AuthError::Storage(format!("failed to serialize credentials: {}", e)))?;
        self.secrets.store(SECRET_KEY, &blob)?;
        self.touch_validated()?;
        self.authenticated.store(true, Ordering::SeqCst);

        info!(base_url = %credentials.base_url, "Authenticated");
        self.notifier
            .info(&format!("Authenticated as {}", user.display_name));
        Ok(credentials)
    }

    /// Read the stored credentials, silently revalidating when due.
    ///
    /// Returns `None` when nothing is stored, when the stored secret is
    /// corrupted, or when a due revalidation fails; in the last two cases
    /// all stored state is cleared and the caller must re-authenticate.
    pub async fn get_credentials(&self) -> Result<Option<Credentials>> {
        let raw = match self.secrets.get(SECRET_KEY)? {
            Some(raw) => raw,
            None => {
                self.authenticated.store(false, Ordering::SeqCst);
                return Ok(None);
            }
        };

        let credentials: Credentials = match serde_json::from_str(&raw) {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("Stored credentials are corrupted, clearing: {}", e);
                self.clear_credentials()?;
                return Ok(None);
            }
        };

        if self.revalidation_due() {
            debug!("Revalidation due, validating silently");
            match validator::validate(&credentials, VALIDATE_TIMEOUT).await {
                Ok(_) => self.touch_validated()?,
                Err(e) => {
                    warn!("Silent revalidation failed, clearing credentials: {}", e);
                    self.notifier
                        .warn(&format!("Stored JIRA credentials are no longer valid: {}", e));
                    self.clear_credentials()?;
                    return Ok(None);
                }
            }
        }

        self.authenticated.store(true, Ordering::SeqCst);
        Ok(Some(credentials))
    }

    /// Delete the secret and the timestamp unconditionally.
    pub fn clear_credentials(&self) -> Result<()> {
        self.secrets.delete(SECRET_KEY)?;
        self.state.update(LAST_VALIDATED_KEY, None)?;
        self.authenticated.store(false, Ordering::SeqCst);
        info!("Credentials cleared");
        Ok(())
    }

    /// Whether valid credentials are currently stored.
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.get_credentials().await, Ok(Some(_)))
    }

    /// Non-destructive status probe.
    ///
    /// Unlike [`get_credentials`](Self::get_credentials), a remote failure
    /// here never clears storage; it only reports `authenticated: false`.
    pub async fn authentication_status(&self) -> AuthStatus {
        let credentials = self
            .secrets
            .get(SECRET_KEY)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str::<Credentials>(&raw).ok());

        let credentials = match credentials {
            Some(credentials) => credentials,
            None => return AuthStatus::default(),
        };

        match validator::validate(&credentials, PROBE_TIMEOUT).await {
            Ok(user) => AuthStatus {
                authenticated: true,
                user: Some(user.display_name),
                base_url: Some(credentials.base_url),
            },
            Err(e) => {
                debug!("Status probe failed: {}", e);
                AuthStatus::default()
            }
        }
    }

    fn touch_validated(&self) -> Result<()> {
        self.state
            .update(LAST_VALIDATED_KEY, Some(&now_millis().to_string()))
    }

    fn revalidation_due(&self) -> bool {
        let last = self
            .state
            .get(LAST_VALIDATED_KEY)
            .and_then(|raw| raw.parse::<u64>().ok());
        match last {
            Some(ts) => now_millis().saturating_sub(ts) > REVALIDATE_AFTER.as_millis() as u64,
            None => true,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
