//! Shared application context.
//!
//! Instead of ambient singletons (a global log channel, a global provider),
//! a single [`AppContext`] is constructed at process start and passed by
//! reference to every component that needs the notifier or the observable
//! authenticated flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fire-and-forget notification surface.
///
/// The core calls this for retry warnings and validation outcomes; it never
/// depends on a return value. The command layer decides how messages reach
/// the user.
pub trait Notifier: Send + Sync {
    /// Informational message (e.g., successful authentication).
    fn info(&self, message: &str);
    /// Warning the user can ignore (e.g., a retry in progress).
    fn warn(&self, message: &str);
    /// Error message for propagated failures.
    fn error(&self, message: &str);
}

/// Notifier that writes to stderr and mirrors into the tracing log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
        eprintln!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
        eprintln!("warning: {}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
        eprintln!("error: {}", message);
    }
}

/// The application context, built once in `main`.
#[derive(Clone)]
pub struct AppContext {
    /// The notification surface.
    pub notifier: Arc<dyn Notifier>,
    /// Observable flag collaborators can poll for authentication state.
    authenticated: Arc<AtomicBool>,
}

impl AppContext {
    /// Create a context around the given notifier.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            authenticated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The shared authenticated flag.
    pub fn authenticated_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.authenticated)
    }

    /// Whether the auth manager currently considers the user authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
pub mod testing {
    //! Test doubles shared by unit tests across modules.

    use super::Notifier;
    use std::sync::Mutex;

    /// Notifier that records every message for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        /// Recorded (level, message) pairs in emission order.
        pub messages: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        /// All recorded messages for a given level.
        pub fn messages_at(&self, level: &str) -> Vec<String> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(("info".to_string(), message.to_string()));
        }

        fn warn(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(("warn".to_string(), message.to_string()));
        }

        fn error(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(("error".to_string(), message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[test]
    fn test_context_flag_starts_unauthenticated() {
        let context = AppContext::new(Arc::new(ConsoleNotifier));
        assert!(!context.is_authenticated());
    }

    #[test]
    fn test_context_flag_is_shared() {
        let context = AppContext::new(Arc::new(ConsoleNotifier));
        let flag = context.authenticated_flag();
        flag.store(true, Ordering::SeqCst);
        assert!(context.is_authenticated());
    }

    #[test]
    fn test_recording_notifier_filters_by_level() {
        let notifier = RecordingNotifier::default();
        notifier.info("connected");
        notifier.warn("retrying");
        notifier.warn("retrying again");

        assert_eq!(notifier.messages_at("info"), vec!["connected"]);
        assert_eq!(notifier.messages_at("warn").len(), 2);
    }
}
