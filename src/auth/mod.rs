//! Credential lifecycle: collection, validation, secure storage and
//! periodic revalidation.

mod credentials;
pub mod error;
mod manager;
pub mod prompt;
pub mod store;
mod validator;

pub use credentials::Credentials;
pub use error::AuthError;
pub use manager::{AuthManager, AuthStatus};
