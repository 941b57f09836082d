//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST
//! API, including the retry policy applied to every operation.

mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::JiraClient;
pub use error::ApiError;
