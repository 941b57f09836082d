//! Interactive credential collection.
//!
//! Collection is a short-circuiting pipeline: each step asks the prompter
//! for one field and validates it, and the pipeline stops at the first abort
//! or invalid value with [`AuthError::MissingInput`] naming the field.

use super::error::{AuthError, Result};

/// A field the pipeline collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The instance base URL; must start with `https://`.
    BaseUrl,
    /// The account email; must contain `@`.
    Email,
    /// The API token; minimum length 10.
    Token,
}

impl Field {
    /// Short label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::BaseUrl => "base URL",
            Field::Email => "email",
            Field::Token => "API token",
        }
    }

    /// Prompt text shown to the user.
    pub fn prompt_text(&self) -> &'static str {
        match self {
            Field::BaseUrl => "JIRA base URL (https://your-site.atlassian.net)",
            Field::Email => "Account email",
            Field::Token => "API token",
        }
    }

    /// Whether the token field should be collected without echo.
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Token)
    }

    fn is_valid(&self, value: &str) -> bool {
        match self {
            Field::BaseUrl => value.starts_with("https://"),
            Field::Email => value.contains('@'),
            Field::Token => value.len() >= 10,
        }
    }
}

/// The result of one collection step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The user supplied a value.
    Value(String),
    /// The user cancelled the step.
    Aborted,
}

/// Source of interactive input; the command layer supplies a console-backed
/// implementation, tests supply scripted ones.
pub trait Prompter {
    /// Ask the user for one field.
    fn prompt(&self, field: Field) -> StepOutcome;
}

/// Raw collected input, prior to normalization.
#[derive(Debug, Clone)]
pub struct CredentialInput {
    /// The base URL as typed (trailing slash not yet stripped).
    pub base_url: String,
    /// The account email.
    pub email: String,
    /// The API token.
    pub api_token: String,
}

/// Run the collection pipeline.
pub fn collect(prompter: &dyn Prompter) -> Result<CredentialInput> {
    let base_url = step(prompter, Field::BaseUrl)?;
    let email = step(prompter, Field::Email)?;
    let api_token = step(prompter, Field::Token)?;
    Ok(CredentialInput {
        base_url,
        email,
        api_token,
    })
}

fn step(prompter: &dyn Prompter, field: Field) -> Result<String> {
    match prompter.prompt(field) {
        StepOutcome::Value(value) => {
            let value = value.trim().to_string();
            if field.is_valid(&value) {
                Ok(value)
            } else {
                Err(AuthError::MissingInput(field.label()))
            }
        }
        StepOutcome::Aborted => Err(AuthError::MissingInput(field.label())),
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted prompter for tests.

    use super::*;
    use std::sync::Mutex;

    /// Prompter that replays a fixed script of outcomes.
    pub struct ScriptedPrompter {
        script: Mutex<Vec<StepOutcome>>,
    }

    impl ScriptedPrompter {
        /// Build a prompter answering each step with the next outcome.
        pub fn new(outcomes: Vec<StepOutcome>) -> Self {
            Self {
                script: Mutex::new(outcomes),
            }
        }

        /// Convenience: answer every step with a value.
        pub fn with_values(values: &[&str]) -> Self {
            Self::new(
                values
                    .iter()
                    .map(|v| StepOutcome::Value(v.to_string()))
                    .collect(),
            )
        }
    }

    impl Prompter for ScriptedPrompter {
        fn prompt(&self, _field: Field) -> StepOutcome {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                StepOutcome::Aborted
            } else {
                script.remove(0)
            }
        }
    }
}
