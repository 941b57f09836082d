//! Categorized issue grouping for sidebar display.
//!
//! Projects a flat issue list into four fixed workflow categories matched by
//! case-insensitive substring over the status name. Construction is
//! stateless and recomputed in full on every refresh.
//!
//! An issue whose status matches none of the four patterns appears in no
//! category at all. That mirrors the historical behavior of this view and
//! is kept deliberately; see DESIGN.md.

use crate::api::types::Issue;

/// The fixed display categories, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Statuses containing "progress" or "development".
    InProgress,
    /// Statuses containing "to do", "open" or "backlog".
    ToDo,
    /// Statuses containing "review" or "testing".
    Review,
    /// Statuses containing "done", "closed" or "resolved".
    Done,
}

/// All categories in display order.
pub const CATEGORIES: [Category; 4] = [
    Category::InProgress,
    Category::ToDo,
    Category::Review,
    Category::Done,
];

impl Category {
    /// The category's display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::InProgress => "In Progress",
            Category::ToDo => "To Do",
            Category::Review => "Review",
            Category::Done => "Done",
        }
    }

    /// Whether a status name belongs to this category.
    ///
    /// Matching is first-match-wins in [`CATEGORIES`] order, so a status
    /// like "In Review" lands in exactly one category.
    pub fn matches(&self, status_name: &str) -> bool {
        let status = status_name.to_lowercase();
        let patterns: &[&str] = match self {
            Category::InProgress => &["progress", "development"],
            Category::ToDo => &["to do", "open", "backlog"],
            Category::Review => &["review", "testing"],
            Category::Done => &["done", "closed", "resolved"],
        };
        patterns.iter().any(|p| status.contains(p))
    }
}

/// One populated category in the tree.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    /// The category.
    pub category: Category,
    /// The issues placed under it, in input order.
    pub issues: Vec<Issue>,
}

/// Group issues into populated categories.
///
/// Categories with no matching issues are omitted; issues matching no
/// category are dropped.
pub fn build_tree(issues: &[Issue]) -> Vec<CategoryNode> {
    CATEGORIES
        .iter()
        .filter_map(|&category| {
            let matched: Vec<Issue> = issues
                .iter()
                .filter(|issue| categorize(issue) == Some(category))
                .cloned()
                .collect();
            if matched.is_empty() {
                None
            } else {
                Some(CategoryNode {
                    category,
                    issues: matched,
                })
            }
        })
        .collect()
}

/// The single category an issue belongs to, if any.
pub fn categorize(issue: &Issue) -> Option<Category> {
    CATEGORIES
        .iter()
        .copied()
        .find(|category| category.matches(issue.status()))
}
