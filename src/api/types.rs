//! JIRA API request and response types.
//!
//! These types model the slice of the JIRA REST API v3 surface the client
//! touches: issues, searches, transitions, comments, projects and the
//! current user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The current authenticated user.
///
/// Returned by `GET /rest/api/3/myself`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// The user's account ID.
    pub account_id: String,
    /// The user's display name.
    pub display_name: String,
    /// The user's email address (may be empty if hidden).
    #[serde(default)]
    pub email_address: String,
    /// Whether the user is active.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Search result from a JQL query.
///
/// Returned by `GET /rest/api/3/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The index of the first result.
    #[serde(default)]
    pub start_at: u32,
    /// Maximum results requested.
    #[serde(default)]
    pub max_results: u32,
    /// Total number of matching issues.
    #[serde(default)]
    pub total: u32,
    /// The list of issues.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A JIRA issue.
///
/// Returned by `GET /rest/api/3/issue/{issueKey}` or as part of search
/// results. Issues are never mutated locally: every change goes through the
/// remote service and callers re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// The issue fields.
    pub fields: IssueFields,
}

impl Issue {
    /// Get the issue summary.
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// Get the issue status name.
    pub fn status(&self) -> &str {
        &self.fields.status.name
    }

    /// Get the issue type name.
    pub fn issue_type(&self) -> &str {
        &self.fields.issuetype.name
    }

    /// Get the assignee display name, or "Unassigned" if not set.
    pub fn assignee_name(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map(|u| u.display_name.as_str())
            .unwrap_or("Unassigned")
    }

    /// Get the reporter display name, or "Unknown" if not set.
    pub fn reporter_name(&self) -> &str {
        self.fields
            .reporter
            .as_ref()
            .map(|u| u.display_name.as_str())
            .unwrap_or("Unknown")
    }

    /// Get the priority name, or "None" if not set.
    pub fn priority_name(&self) -> &str {
        self.fields
            .priority
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("None")
    }

    /// Get the resolution name, or "Unresolved" if not set.
    pub fn resolution_name(&self) -> &str {
        self.fields
            .resolution
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or("Unresolved")
    }

    /// Get the description as plain text, or an empty string if not set.
    pub fn description_text(&self) -> String {
        self.fields
            .description
            .as_ref()
            .map(|d| {
                if let Ok(doc) = serde_json::from_value::<AtlassianDoc>(d.clone()) {
                    doc.to_plain_text()
                } else if let Some(s) = d.as_str() {
                    s.to_string()
                } else {
                    String::new()
                }
            })
            .unwrap_or_default()
    }

    /// Get the project key, if available.
    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref().map(|p| p.key.as_str())
    }

    /// Get the comments embedded in the issue, oldest first.
    pub fn comments(&self) -> &[Comment] {
        self.fields
            .comment
            .as_ref()
            .map(|c| c.comments.as_slice())
            .unwrap_or(&[])
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.fields.summary)
    }
}

/// Issue fields.
///
/// Optional remote fields (priority, assignee, reporter, resolution, comment)
/// may be absent or null; accessors on [`Issue`] provide explicit "missing"
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue summary/title.
    pub summary: String,
    /// The issue description (may be in Atlassian Document Format).
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    /// The issue status.
    pub status: Status,
    /// The issue type (Bug, Story, Task, etc.).
    pub issuetype: IssueType,
    /// The issue priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// The issue assignee.
    #[serde(default)]
    pub assignee: Option<User>,
    /// The issue reporter.
    #[serde(default)]
    pub reporter: Option<User>,
    /// The resolution, once the issue is resolved.
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// The project this issue belongs to.
    #[serde(default)]
    pub project: Option<Project>,
    /// Comments, when the issue was fetched with the comment field.
    #[serde(default)]
    pub comment: Option<CommentsPage>,
    /// When the issue was created.
    #[serde(default)]
    pub created: Option<String>,
    /// When the issue was last updated.
    #[serde(default)]
    pub updated: Option<String>,
}

/// Issue status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// The status name (e.g., "To Do", "In Progress", "Done").
    pub name: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Issue type (Bug, Story, Task, Epic, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueType {
    /// The issue type name.
    pub name: String,
}

/// Issue priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    /// The priority name (e.g., "Highest", "High", "Medium", "Low").
    pub name: String,
}

/// Issue resolution (e.g., "Done", "Won't Do").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// The resolution name.
    pub name: String,
}

/// A JIRA user as it appears on issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's account ID.
    #[serde(default)]
    pub account_id: Option<String>,
    /// The user's display name.
    pub display_name: String,
    /// The user's email address (may be hidden).
    #[serde(default)]
    pub email_address: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A JIRA project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// The project key (e.g., "PROJ").
    pub key: String,
    /// The project name.
    pub name: String,
}

/// Paged project list.
///
/// Returned by `GET /rest/api/3/project/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSearchResult {
    /// The projects on this page.
    #[serde(default)]
    pub values: Vec<Project>,
}

/// A workflow transition available for an issue.
///
/// Returned by `GET /rest/api/3/issue/{issueKey}/transitions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    /// The transition ID, passed back when applying it.
    pub id: String,
    /// The transition name (e.g., "Start Progress").
    pub name: String,
    /// The status the issue lands in after the transition.
    #[serde(default)]
    pub to: Option<Status>,
}

/// Transition list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionsResponse {
    /// The available transitions.
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// A comment on a JIRA issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// The comment ID.
    pub id: String,
    /// The comment body in Atlassian Document Format.
    pub body: AtlassianDoc,
    /// The user who authored the comment.
    pub author: User,
    /// When the comment was created.
    pub created: String,
}

/// Embedded comment page on an issue's fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsPage {
    /// The comments on this page.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Request body for creating an issue.
///
/// Built by [`crate::api::JiraClient::create_issue`] after default-project
/// resolution; callers supply a [`NewIssue`].
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    /// The fields of the new issue.
    pub fields: CreateIssueFields,
}

/// Fields for a new issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueFields {
    /// Target project, by key.
    pub project: ProjectRef,
    /// The issue summary.
    pub summary: String,
    /// The description, as an Atlassian document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AtlassianDoc>,
    /// The issue type, by name.
    pub issuetype: IssueTypeRef,
}

/// Project reference by key.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRef {
    /// The project key.
    pub key: String,
}

/// Issue type reference by name.
#[derive(Debug, Clone, Serialize)]
pub struct IssueTypeRef {
    /// The issue type name.
    pub name: String,
}

/// Caller-facing input for creating an issue.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    /// The issue summary (required).
    pub summary: String,
    /// An optional plain-text description.
    pub description: Option<String>,
    /// The issue type name; defaults to "Task".
    pub issue_type: Option<String>,
    /// The target project key; when absent the first accessible project is
    /// used.
    pub project_key: Option<String>,
}

/// A freshly created issue.
///
/// Returned by `POST /rest/api/3/issue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// The new issue's ID.
    pub id: String,
    /// The new issue's key.
    pub key: String,
}

/// Atlassian Document Format (ADF) content.
///
/// JIRA uses ADF for rich text fields like descriptions and comments. This
/// struct represents the document structure, builds single-paragraph
/// documents from plain text, and flattens documents back to plain text for
/// display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlassianDoc {
    /// The document type (always "doc" for root documents).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// The document version (typically 1).
    #[serde(default)]
    pub version: Option<u32>,
    /// The content nodes within the document.
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
}

impl AtlassianDoc {
    /// Wrap plain text in a single-paragraph document.
    pub fn from_text(text: &str) -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: Some(1),
            content: vec![serde_json::json!({
                "type": "paragraph",
                "content": [{"type": "text", "text": text}],
            })],
        }
    }

    /// Convert ADF content to plain text for display.
    ///
    /// Recursively extracts text nodes, preserving paragraphs, line breaks
    /// and list items.
    pub fn to_plain_text(&self) -> String {
        let mut result = String::new();
        for node in &self.content {
            Self::extract_text(node, &mut result);
        }
        result.trim().to_string()
    }

    fn extract_text(node: &serde_json::Value, result: &mut String) {
        let obj = match node {
            serde_json::Value::Object(obj) => obj,
            serde_json::Value::Array(items) => {
                for item in items {
                    Self::extract_text(item, result);
                }
                return;
            }
            _ => return,
        };

        match obj.get("type").and_then(|t| t.as_str()) {
            Some("text") => {
                if let Some(text) = obj.get("text").and_then(|t| t.as_str()) {
                    result.push_str(text);
                }
            }
            Some("paragraph") | Some("heading") => {
                Self::extract_children(obj, result);
                if !result.ends_with('\n') && !result.is_empty() {
                    result.push('\n');
                }
            }
            Some("hardBreak") => {
                result.push('\n');
            }
            Some("listItem") => {
                result.push_str("• ");
                Self::extract_children(obj, result);
            }
            Some("mention") => {
                if let Some(text) = obj
                    .get("attrs")
                    .and_then(|a| a.get("text"))
                    .and_then(|t| t.as_str())
                {
                    result.push('@');
                    result.push_str(text);
                }
            }
            // Unknown nodes: recurse into their content.
            _ => Self::extract_children(obj, result),
        }
    }

    fn extract_children(obj: &serde_json::Map<String, serde_json::Value>, result: &mut String) {
        if let Some(serde_json::Value::Array(items)) = obj.get("content") {
            for item in items {
                Self::extract_text(item, result);
            }
        }
    }
}

impl Default for AtlassianDoc {
    fn default() -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: Some(1),
            content: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn issue_with_status(key: &str, status: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                summary: format!("Summary for {}", key),
                description: None,
                status: Status {
                    name: status.to_string(),
                },
                issuetype: IssueType {
                    name: "Task".to_string(),
                },
                priority: None,
                assignee: None,
                reporter: None,
                resolution: None,
                project: None,
                comment: None,
                created: None,
                updated: None,
            },
        }
    }

    #[test]
    fn test_parse_minimal_issue() {
        let json = r#"{
            "key": "PROJ-123",
            "fields": {
                "summary": "Test issue",
                "status": {"name": "To Do"},
                "issuetype": {"name": "Bug"}
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, "PROJ-123");
        assert_eq!(issue.summary(), "Test issue");
        assert_eq!(issue.status(), "To Do");
        assert_eq!(issue.issue_type(), "Bug");
        assert_eq!(issue.assignee_name(), "Unassigned");
        assert_eq!(issue.priority_name(), "None");
        assert_eq!(issue.resolution_name(), "Unresolved");
        assert!(issue.comments().is_empty());
    }

    #[test]
    fn test_parse_full_issue() {
        let json = r#"{
            "key": "PROJ-123",
            "fields": {
                "summary": "Full issue",
                "status": {"name": "In Progress"},
                "issuetype": {"name": "Story"},
                "priority": {"name": "High"},
                "assignee": {"displayName": "John Doe", "emailAddress": "john@example.com"},
                "reporter": {"displayName": "Jane Smith"},
                "resolution": {"name": "Done"},
                "project": {"key": "PROJ", "name": "My Project"},
                "created": "2024-01-15T10:00:00.000+0000",
                "updated": "2024-01-16T14:30:00.000+0000"
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.assignee_name(), "John Doe");
        assert_eq!(issue.reporter_name(), "Jane Smith");
        assert_eq!(issue.priority_name(), "High");
        assert_eq!(issue.resolution_name(), "Done");
        assert_eq!(issue.project_key(), Some("PROJ"));
    }

    #[test]
    fn test_parse_issue_with_null_optionals() {
        let json = r#"{
            "key": "PROJ-9",
            "fields": {
                "summary": "Nulls",
                "status": {"name": "Open"},
                "issuetype": {"name": "Bug"},
                "priority": null,
                "assignee": null,
                "reporter": null,
                "resolution": null,
                "project": null
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.assignee_name(), "Unassigned");
        assert_eq!(issue.reporter_name(), "Unknown");
        assert_eq!(issue.priority_name(), "None");
        assert_eq!(issue.resolution_name(), "Unresolved");
        assert!(issue.project_key().is_none());
    }

    #[test]
    fn test_parse_issue_with_comments() {
        let json = r#"{
            "key": "PROJ-7",
            "fields": {
                "summary": "Commented",
                "status": {"name": "Open"},
                "issuetype": {"name": "Bug"},
                "comment": {
                    "comments": [
                        {
                            "id": "10001",
                            "body": {
                                "type": "doc",
                                "version": 1,
                                "content": [
                                    {"type": "paragraph", "content": [
                                        {"type": "text", "text": "First!"}
                                    ]}
                                ]
                            },
                            "author": {"displayName": "John Doe"},
                            "created": "2024-01-15T10:00:00.000+0000"
                        }
                    ]
                }
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.comments().len(), 1);
        assert_eq!(issue.comments()[0].body.to_plain_text(), "First!");
        assert_eq!(issue.comments()[0].author.display_name, "John Doe");
    }

    #[test]
    fn test_parse_search_result() {
        let json = r#"{
            "startAt": 0,
            "maxResults": 50,
            "total": 2,
            "issues": [
                {
                    "key": "PROJ-1",
                    "fields": {
                        "summary": "First issue",
                        "status": {"name": "Open"},
                        "issuetype": {"name": "Bug"}
                    }
                },
                {
                    "key": "PROJ-2",
                    "fields": {
                        "summary": "Second issue",
                        "status": {"name": "Done"},
                        "issuetype": {"name": "Task"}
                    }
                }
            ]
        }"#;

        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.issues.len(), 2);
        assert_eq!(result.issues[0].key, "PROJ-1");
    }

    #[test]
    fn test_parse_transitions() {
        let json = r#"{
            "transitions": [
                {"id": "11", "name": "Start Progress", "to": {"name": "In Progress"}},
                {"id": "21", "name": "Resolve"}
            ]
        }"#;

        let response: TransitionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.transitions.len(), 2);
        assert_eq!(response.transitions[0].id, "11");
        assert_eq!(
            response.transitions[0].to.as_ref().unwrap().name,
            "In Progress"
        );
        assert!(response.transitions[1].to.is_none());
    }

    #[test]
    fn test_adf_from_text_flattens_back() {
        let doc = AtlassianDoc::from_text("hello");
        assert_eq!(doc.doc_type, "doc");
        assert_eq!(doc.version, Some(1));
        assert_eq!(doc.to_plain_text(), "hello");
    }

    #[test]
    fn test_adf_serialized_shape() {
        let doc = AtlassianDoc::from_text("hello");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], "doc");
        assert_eq!(value["content"][0]["type"], "paragraph");
        assert_eq!(value["content"][0]["content"][0]["text"], "hello");
    }

    #[test]
    fn test_adf_multiple_paragraphs() {
        let json = r#"{
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "First."}]},
                {"type": "paragraph", "content": [{"type": "text", "text": "Second."}]}
            ]
        }"#;

        let doc: AtlassianDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.to_plain_text(), "First.\nSecond.");
    }

    #[test]
    fn test_adf_hard_break_and_mention() {
        let json = r#"{
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Line one"},
                    {"type": "hardBreak"},
                    {"type": "text", "text": "ping "},
                    {"type": "mention", "attrs": {"id": "abc", "text": "John Doe"}}
                ]}
            ]
        }"#;

        let doc: AtlassianDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.to_plain_text(), "Line one\nping @John Doe");
    }

    #[test]
    fn test_adf_list_items() {
        let json = r#"{
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "Item one"}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "Item two"}]}
                    ]}
                ]}
            ]
        }"#;

        let doc: AtlassianDoc = serde_json::from_str(json).unwrap();
        let text = doc.to_plain_text();
        assert!(text.contains("• Item one"));
        assert!(text.contains("• Item two"));
    }

    #[test]
    fn test_adf_empty() {
        assert_eq!(AtlassianDoc::default().to_plain_text(), "");
    }

    #[test]
    fn test_issue_display() {
        let issue = issue_with_status("TEST-1", "Open");
        assert_eq!(format!("{}", issue), "TEST-1: Summary for TEST-1");
    }

    #[test]
    fn test_create_issue_request_shape() {
        let request = CreateIssueRequest {
            fields: CreateIssueFields {
                project: ProjectRef {
                    key: "PROJ".to_string(),
                },
                summary: "New issue".to_string(),
                description: Some(AtlassianDoc::from_text("Details")),
                issuetype: IssueTypeRef {
                    name: "Task".to_string(),
                },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["fields"]["project"]["key"], "PROJ");
        assert_eq!(value["fields"]["summary"], "New issue");
        assert_eq!(value["fields"]["issuetype"]["name"], "Task");
        assert_eq!(
            value["fields"]["description"]["content"][0]["content"][0]["text"],
            "Details"
        );
    }

    #[test]
    fn test_create_issue_request_omits_missing_description() {
        let request = CreateIssueRequest {
            fields: CreateIssueFields {
                project: ProjectRef {
                    key: "PROJ".to_string(),
                },
                summary: "No description".to_string(),
                description: None,
                issuetype: IssueTypeRef {
                    name: "Bug".to_string(),
                },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value["fields"].get("description").is_none());
    }
}
