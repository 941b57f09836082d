//! Command layer: thin glue between the CLI, the auth manager and the API
//! client.
//!
//! Commands orchestrate and render; all logic lives in the modules they
//! call. Each invocation runs to completion (including retry waits) before
//! the next one starts.

use std::io::{BufRead, Write};

use clap::Subcommand;

use crate::api::types::NewIssue;
use crate::api::{ApiError, JiraClient};
use crate::auth::prompt::{Field, Prompter, StepOutcome};
use crate::auth::store::{FileStateStore, KeyringSecretStore};
use crate::auth::AuthManager;
use crate::config::{self, Settings};
use crate::context::AppContext;
use crate::error::Result;
use crate::tree;

/// The sidejira subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in: collect base URL, email and API token, then validate.
    Login,
    /// Sign out and delete the stored credentials.
    Logout,
    /// Show the current authentication status.
    Status,
    /// List issues grouped by workflow category.
    List {
        /// JQL override; defaults to your unresolved issues.
        #[arg(long)]
        jql: Option<String>,
        /// Page size (max 100).
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Show one issue, comments included.
    Show {
        /// The issue key, e.g. PROJ-123.
        key: String,
    },
    /// Add a comment to an issue.
    Comment {
        /// The issue key.
        key: String,
        /// The comment text.
        text: String,
    },
    /// List the transitions available for an issue.
    Transitions {
        /// The issue key.
        key: String,
    },
    /// Apply a workflow transition to an issue.
    Move {
        /// The issue key.
        key: String,
        /// The transition ID (see `transitions`).
        transition: String,
    },
    /// Create an issue.
    Create {
        /// The issue summary.
        #[arg(long)]
        summary: String,
        /// An optional description.
        #[arg(long)]
        description: Option<String>,
        /// The issue type name; defaults to Task.
        #[arg(long)]
        issue_type: Option<String>,
        /// The project key; defaults to the first accessible project.
        #[arg(long)]
        project: Option<String>,
    },
    /// Set or clear an issue's assignee.
    Assign {
        /// The issue key.
        key: String,
        /// Account ID of the new assignee; omit to clear.
        #[arg(long)]
        account: Option<String>,
    },
    /// List accessible projects.
    Projects,
}

/// Prompter backed by stdin/stdout.
struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn prompt(&self, field: Field) -> StepOutcome {
        print!("{}: ", field.prompt_text());
        if std::io::stdout().flush().is_err() {
            return StepOutcome::Aborted;
        }

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => StepOutcome::Aborted,
            Ok(_) => StepOutcome::Value(line.trim_end().to_string()),
        }
    }
}

fn auth_manager(context: &AppContext) -> Result<AuthManager<KeyringSecretStore, FileStateStore>> {
    let state = FileStateStore::new(config::state_path()?);
    Ok(AuthManager::new(KeyringSecretStore::new(), state, context))
}

/// Build a client bound to the stored credentials, or fail with
/// `NotAuthenticated` when none are stored (or revalidation dropped them).
async fn client(context: &AppContext) -> Result<JiraClient> {
    let manager = auth_manager(context)?;
    let credentials = manager
        .get_credentials()
        .await?
        .ok_or(ApiError::NotAuthenticated)?;

    let mut client = JiraClient::new(std::sync::Arc::clone(&context.notifier));
    client.set_credentials(&credentials)?;
    Ok(client)
}

/// Dispatch one command.
pub async fn run(context: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login => login(context).await,
        Command::Logout => logout(context),
        Command::Status => status(context).await,
        Command::List { jql, max_results } => list(context, jql, max_results).await,
        Command::Show { key } => show(context, &key).await,
        Command::Comment { key, text } => comment(context, &key, &text).await,
        Command::Transitions { key } => transitions(context, &key).await,
        Command::Move { key, transition } => apply_transition(context, &key, &transition).await,
        Command::Create {
            summary,
            description,
            issue_type,
            project,
        } => {
            create(
                context,
                NewIssue {
                    summary,
                    description,
                    issue_type,
                    project_key: project,
                },
            )
            .await
        }
        Command::Assign { key, account } => assign(context, &key, account.as_deref()).await,
        Command::Projects => projects(context).await,
    }
}

async fn login(context: &AppContext) -> Result<()> {
    let manager = auth_manager(context)?;
    let credentials = manager.authenticate(&ConsolePrompter).await?;
    println!("Signed in to {}", credentials.base_url);
    Ok(())
}

fn logout(context: &AppContext) -> Result<()> {
    auth_manager(context)?.clear_credentials()?;
    println!("Signed out.");
    Ok(())
}

async fn status(context: &AppContext) -> Result<()> {
    let status = auth_manager(context)?.authentication_status().await;
    if status.authenticated {
        println!(
            "Signed in as {} at {}",
            status.user.as_deref().unwrap_or("unknown"),
            status.base_url.as_deref().unwrap_or("unknown")
        );
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

async fn list(context: &AppContext, jql: Option<String>, max_results: Option<u32>) -> Result<()> {
    let settings = Settings::load(&config::settings_path()?)?;
    let jql = jql.or(settings.default_jql);
    let max_results = max_results.or(settings.max_results);

    let client = client(context).await?;
    let result = client
        .search_issues(jql.as_deref(), max_results)
        .await?;

    let nodes = tree::build_tree(&result.issues);
    if nodes.is_empty() {
        println!("No issues.");
        return Ok(());
    }
    for node in nodes {
        println!("{} ({})", node.category.label(), node.issues.len());
        for issue in &node.issues {
            println!("  {}  {}  [{}]", issue.key, issue.summary(), issue.status());
        }
    }
    Ok(())
}

async fn show(context: &AppContext, key: &str) -> Result<()> {
    let client = client(context).await?;
    let issue = client.get_issue(key).await?;

    println!("{}", issue);
    println!("  Type:       {}", issue.issue_type());
    println!("  Status:     {}", issue.status());
    println!("  Priority:   {}", issue.priority_name());
    println!("  Assignee:   {}", issue.assignee_name());
    println!("  Reporter:   {}", issue.reporter_name());
    println!("  Resolution: {}", issue.resolution_name());
    if let Some(created) = &issue.fields.created {
        println!("  Created:    {}", created);
    }
    if let Some(updated) = &issue.fields.updated {
        println!("  Updated:    {}", updated);
    }

    let description = issue.description_text();
    if !description.is_empty() {
        println!("\n{}", description);
    }

    let comments = issue.comments();
    if !comments.is_empty() {
        println!("\nComments:");
        for comment in comments {
            println!(
                "  {} ({}): {}",
                comment.author.display_name,
                comment.created,
                comment.body.to_plain_text()
            );
        }
    }
    Ok(())
}

async fn comment(context: &AppContext, key: &str, text: &str) -> Result<()> {
    let client = client(context).await?;
    client.add_comment(key, text).await?;
    println!("Comment added to {}.", key);
    Ok(())
}

async fn transitions(context: &AppContext, key: &str) -> Result<()> {
    let client = client(context).await?;
    let transitions = client.list_transitions(key).await?;
    if transitions.is_empty() {
        println!("No transitions available for {}.", key);
        return Ok(());
    }
    for transition in transitions {
        match &transition.to {
            Some(to) => println!("  {}  {} -> {}", transition.id, transition.name, to.name),
            None => println!("  {}  {}", transition.id, transition.name),
        }
    }
    Ok(())
}

async fn apply_transition(context: &AppContext, key: &str, transition_id: &str) -> Result<()> {
    let client = client(context).await?;
    client.transition_issue(key, transition_id).await?;
    println!("{} moved.", key);
    Ok(())
}

async fn create(context: &AppContext, new_issue: NewIssue) -> Result<()> {
    let client = client(context).await?;
    let created = client.create_issue(&new_issue).await?;
    println!("Created {}.", created.key);
    Ok(())
}

async fn assign(context: &AppContext, key: &str, account: Option<&str>) -> Result<()> {
    let client = client(context).await?;
    client.assign_issue(key, account).await?;
    match account {
        Some(account) => println!("{} assigned to {}.", key, account),
        None => println!("{} unassigned.", key),
    }
    Ok(())
}

async fn projects(context: &AppContext) -> Result<()> {
    let client = client(context).await?;
    for project in client.list_projects().await? {
        println!("  {}  {}", project.key, project.name);
    }
    Ok(())
}
