//! JIRA API client implementation.
//!
//! The client wraps the JIRA REST API v3 with uniform error shaping and the
//! retry policy from [`super::retry`]. It holds no issue state: every write
//! is fire-and-confirm and callers re-fetch what they need.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::error::{ApiError, Result};
use super::retry::run_with_retry;
use super::types::{
    AtlassianDoc, Comment, CreateIssueFields, CreateIssueRequest, CreatedIssue, CurrentUser,
    Issue, IssueTypeRef, NewIssue, Project, ProjectRef, ProjectSearchResult, SearchResult,
    Transition, TransitionsResponse,
};
use crate::auth::Credentials;
use crate::context::Notifier;

/// Request timeout for API calls in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default page size for issue searches.
const DEFAULT_MAX_RESULTS: u32 = 50;

/// Default JQL: the current user's unresolved issues, newest-updated first.
const DEFAULT_JQL: &str = "assignee = currentUser() AND resolution = Unresolved ORDER BY updated DESC";

/// Issue fields requested on searches and fetches.
const ISSUE_FIELDS: &str =
    "summary,description,status,issuetype,project,priority,assignee,reporter,resolution,created,updated";

/// The JIRA API client.
///
/// Credentials must be set before any operation; operations invoked on an
/// unbound client fail fast with [`ApiError::NotAuthenticated`].
pub struct JiraClient {
    notifier: Arc<dyn Notifier>,
    transport: Option<Transport>,
}

/// The bound HTTP transport: base URL, auth header, shared reqwest client.
struct Transport {
    http: Client,
    api_root: String,
    auth_header: String,
}

impl JiraClient {
    /// Create an unbound client.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            transport: None,
        }
    }

    /// Bind the client to a credential set.
    ///
    /// Builds the underlying transport against `{base_url}/rest/api/3` with
    /// a Basic auth header and a fixed request timeout.
    pub fn set_credentials(&mut self, credentials: &Credentials) -> Result<()> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        self.transport = Some(Transport {
            http,
            api_root: credentials.api_root(),
            auth_header: credentials.auth_header(),
        });
        Ok(())
    }

    /// Whether credentials have been set.
    pub fn has_credentials(&self) -> bool {
        self.transport.is_some()
    }

    fn transport(&self) -> Result<&Transport> {
        self.transport.as_ref().ok_or(ApiError::NotAuthenticated)
    }

    /// Search for issues using JQL.
    ///
    /// Defaults: the current user's unresolved issues, newest-updated first,
    /// page size 50.
    #[instrument(skip(self))]
    pub async fn search_issues(
        &self,
        jql: Option<&str>,
        max_results: Option<u32>,
    ) -> Result<SearchResult> {
        let transport = self.transport()?;
        let jql = jql.unwrap_or(DEFAULT_JQL);
        let max_results = max_results.unwrap_or(DEFAULT_MAX_RESULTS).min(100);

        let path = format!(
            "/search?jql={}&maxResults={}&fields={}",
            urlencoding::encode(jql),
            max_results,
            ISSUE_FIELDS
        );

        let result: SearchResult =
            run_with_retry(self.notifier.as_ref(), "search issues", || {
                transport.get(&path)
            })
            .await?;
        debug!("Found {} issues (total: {})", result.issues.len(), result.total);
        Ok(result)
    }

    /// Fetch a single issue by key, comments included.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        let transport = self.transport()?;
        let path = format!("/issue/{}?fields={},comment", key, ISSUE_FIELDS);
        run_with_retry(self.notifier.as_ref(), "fetch issue", || {
            transport.get(&path)
        })
        .await
    }

    /// List the workflow transitions currently available for an issue.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn list_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let transport = self.transport()?;
        let path = format!("/issue/{}/transitions", key);
        let response: TransitionsResponse =
            run_with_retry(self.notifier.as_ref(), "list transitions", || {
                transport.get(&path)
            })
            .await?;
        Ok(response.transitions)
    }

    /// Apply a transition to an issue.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn transition_issue(&self, key: &str, transition_id: &str) -> Result<()> {
        let transport = self.transport()?;
        let path = format!("/issue/{}/transitions", key);
        let body = serde_json::json!({"transition": {"id": transition_id}});
        run_with_retry(self.notifier.as_ref(), "apply transition", || {
            transport.post_no_content(&path, &body)
        })
        .await
    }

    /// Add a plain-text comment to an issue.
    ///
    /// The text is wrapped in a single-paragraph Atlassian document.
    #[instrument(skip(self, text), fields(issue_key = %key))]
    pub async fn add_comment(&self, key: &str, text: &str) -> Result<Comment> {
        let transport = self.transport()?;
        let path = format!("/issue/{}/comment", key);
        let body = serde_json::json!({"body": AtlassianDoc::from_text(text)});
        run_with_retry(self.notifier.as_ref(), "add comment", || {
            transport.post(&path, &body)
        })
        .await
    }

    /// Create an issue.
    ///
    /// When no project key is given, the first accessible project is used;
    /// if none exist the operation fails with
    /// [`ApiError::NoAccessibleProjects`]. The issue type defaults to
    /// "Task".
    #[instrument(skip(self, new_issue))]
    pub async fn create_issue(&self, new_issue: &NewIssue) -> Result<CreatedIssue> {
        let transport = self.transport()?;

        let project_key = match &new_issue.project_key {
            Some(key) => key.clone(),
            None => {
                let projects = self.list_projects().await?;
                projects
                    .first()
                    .map(|p| p.key.clone())
                    .ok_or(ApiError::NoAccessibleProjects)?
            }
        };

        let request = CreateIssueRequest {
            fields: CreateIssueFields {
                project: ProjectRef { key: project_key },
                summary: new_issue.summary.clone(),
                description: new_issue
                    .description
                    .as_deref()
                    .map(AtlassianDoc::from_text),
                issuetype: IssueTypeRef {
                    name: new_issue
                        .issue_type
                        .clone()
                        .unwrap_or_else(|| "Task".to_string()),
                },
            },
        };

        run_with_retry(self.notifier.as_ref(), "create issue", || {
            transport.post("/issue", &request)
        })
        .await
    }

    /// List the projects the user can see.
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let transport = self.transport()?;
        let result: ProjectSearchResult =
            run_with_retry(self.notifier.as_ref(), "list projects", || {
                transport.get("/project/search?maxResults=50")
            })
            .await?;
        Ok(result.values)
    }

    /// Fetch the current authenticated user.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<CurrentUser> {
        let transport = self.transport()?;
        run_with_retry(self.notifier.as_ref(), "fetch current user", || {
            transport.get("/myself")
        })
        .await
    }

    /// Set or clear an issue's assignee.
    ///
    /// `None` clears the assignee.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn assign_issue(&self, key: &str, account_id: Option<&str>) -> Result<()> {
        let transport = self.transport()?;
        let path = format!("/issue/{}/assignee", key);
        let body = serde_json::json!({"accountId": account_id});
        run_with_retry(self.notifier.as_ref(), "set assignee", || {
            transport.put_no_content(&path, &body)
        })
        .await
    }
}

impl Transport {
    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.api_root, path_and_query)
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path_and_query))
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::parse_json(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path_and_query))
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Self::parse_json(response).await
    }

    async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        path_and_query: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .http
            .post(self.url(path_and_query))
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Self::ensure_success(response).await
    }

    async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        path_and_query: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .http
            .put(self.url(path_and_query))
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Self::ensure_success(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("failed to parse response: {}", e)))
        } else {
            Err(Self::error_from_response(status, response).await)
        }
    }

    async fn ensure_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(status, response).await)
        }
    }

    /// Shape an HTTP error into a uniform, human-readable message.
    ///
    /// Preference order: first body-supplied error list entry, then a
    /// body-supplied single message, then the status text.
    async fn error_from_response(status: StatusCode, response: Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        debug!("Error response body: {}", body);
        ApiError::from_status(status, &Self::shape_message(status, &body))
    }

    fn shape_message(status: StatusCode, body: &str) -> String {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(first) = json
                .get("errorMessages")
                .and_then(|m| m.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.as_str())
            {
                return first.to_string();
            }
            if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    }
}
