//! Host-facing task and comment projections.

use super::{RemoteTaskId, TaskKind, TaskState};
use crate::reference::domain::User;
use chrono::{DateTime, Utc};

/// `strftime` pattern for comment dates.
pub const COMMENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Returns the web address of a task.
#[must_use]
pub fn issue_url(id: RemoteTaskId) -> String {
    format!("https://kanbanery.com/tasks/{id}/in-context")
}

/// A comment prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedComment {
    author: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    body: String,
}

impl MappedComment {
    /// Creates a display comment.
    #[must_use]
    pub fn new(
        author: impl Into<String>,
        avatar_url: Option<String>,
        created_at: DateTime<Utc>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            avatar_url,
            created_at,
            body: body.into(),
        }
    }

    /// Returns the author display name.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the author's avatar URL, if known.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the comment body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Renders the comment as an HTML fragment: author, date, then body.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut out = String::new();
        self.append_to(&mut out);
        out
    }

    /// Appends the rendered fragment to `out`.
    pub fn append_to(&self, out: &mut String) {
        out.push_str("<hr><table><tr><td>");
        if let Some(url) = &self.avatar_url {
            out.push_str(&format!("<img src=\"{}?s=40\"/><br>", escape_html(url)));
        }
        out.push_str("</td><td>");
        out.push_str(&format!("<b>Author:</b> {}<br>", escape_html(&self.author)));
        out.push_str(&format!(
            "<b>Date:</b> {}<br>",
            self.created_at.format(COMMENT_DATE_FORMAT)
        ));
        out.push_str("</td></tr></table>");
        out.push_str(&self.body);
        out.push_str("<br>");
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Parameter object for assembling a [`MappedTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedTaskParts {
    /// Remote identifier.
    pub remote_id: RemoteTaskId,
    /// Task title.
    pub summary: String,
    /// `[#id] (type): title` display name.
    pub presentable_name: String,
    /// Description, empty when absent.
    pub description: String,
    /// Inferred state.
    pub state: TaskState,
    /// Inferred category.
    pub kind: TaskKind,
    /// Resolved task-type name.
    pub type_name: String,
    /// Resolved creator.
    pub creator: User,
    /// Resolved owner, the "no one" sentinel when unassigned.
    pub owner: User,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Mapped comments in service order.
    pub comments: Vec<MappedComment>,
}

/// A task in the host's task model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedTask {
    id: String,
    remote_id: RemoteTaskId,
    summary: String,
    presentable_name: String,
    description: String,
    state: TaskState,
    kind: TaskKind,
    type_name: String,
    creator: User,
    owner: User,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    comments: Vec<MappedComment>,
    issue_url: String,
}

impl MappedTask {
    /// Assembles a task from mapped parts.
    #[must_use]
    pub fn from_parts(parts: MappedTaskParts) -> Self {
        Self {
            id: parts.remote_id.to_string(),
            remote_id: parts.remote_id,
            summary: parts.summary,
            presentable_name: parts.presentable_name,
            description: parts.description,
            state: parts.state,
            kind: parts.kind,
            type_name: parts.type_name,
            creator: parts.creator,
            owner: parts.owner,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            comments: parts.comments,
            issue_url: issue_url(parts.remote_id),
        }
    }

    /// Returns the string form of the remote identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the remote identifier.
    #[must_use]
    pub const fn remote_id(&self) -> RemoteTaskId {
        self.remote_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the `[#id] (type): title` display name.
    #[must_use]
    pub fn presentable_name(&self) -> &str {
        &self.presentable_name
    }

    /// Returns the description; empty when the remote had none.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the inferred state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the inferred category.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the resolved task-type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the resolved creator.
    #[must_use]
    pub const fn creator(&self) -> &User {
        &self.creator
    }

    /// Returns the resolved owner.
    #[must_use]
    pub const fn owner(&self) -> &User {
        &self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the mapped comments.
    #[must_use]
    pub fn comments(&self) -> &[MappedComment] {
        &self.comments
    }

    /// Returns the web address of the task.
    #[must_use]
    pub fn issue_url(&self) -> &str {
        &self.issue_url
    }

    /// Concatenates the fragments of all comments.
    #[must_use]
    pub fn comments_fragment(&self) -> String {
        let mut out = String::new();
        for comment in &self.comments {
            comment.append_to(&mut out);
        }
        out
    }
}
