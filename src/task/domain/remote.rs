//! Raw task and comment records as served by the remote API.

use super::{CommentId, RemoteTaskId};
use crate::reference::domain::{TaskTypeId, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task record as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    id: RemoteTaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    type_label: Option<String>,
    #[serde(default)]
    ready_to_pull: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    task_type_id: Option<TaskTypeId>,
    #[serde(default)]
    creator_id: Option<UserId>,
    #[serde(default)]
    owner_id: Option<UserId>,
}

impl RemoteTask {
    /// Creates a task record with required fields only.
    #[must_use]
    pub fn new(id: RemoteTaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            type_label: None,
            ready_to_pull: false,
            created_at: None,
            updated_at: None,
            task_type_id: None,
            creator_id: None,
            owner_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the type label ("Bug", "New Feature", ...).
    #[must_use]
    pub fn with_type_label(mut self, label: impl Into<String>) -> Self {
        self.type_label = Some(label.into());
        self
    }

    /// Sets the ready-to-pull flag.
    #[must_use]
    pub const fn with_ready_to_pull(mut self, ready_to_pull: bool) -> Self {
        self.ready_to_pull = ready_to_pull;
        self
    }

    /// Sets creation and update timestamps.
    #[must_use]
    pub const fn with_timestamps(
        mut self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    /// Sets the task-type reference.
    #[must_use]
    pub const fn with_task_type(mut self, task_type_id: TaskTypeId) -> Self {
        self.task_type_id = Some(task_type_id);
        self
    }

    /// Sets the creator reference.
    #[must_use]
    pub const fn with_creator(mut self, creator_id: UserId) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    /// Sets the owner reference.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Updates the ready-to-pull flag as the service does on a mark call.
    pub fn mark(&mut self, ready_to_pull: bool, at: DateTime<Utc>) {
        self.ready_to_pull = ready_to_pull;
        self.updated_at = Some(at);
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> RemoteTaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the type label, if any.
    #[must_use]
    pub fn type_label(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    /// Returns the ready-to-pull flag.
    #[must_use]
    pub const fn ready_to_pull(&self) -> bool {
        self.ready_to_pull
    }

    /// Returns the creation timestamp, if reported.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the update timestamp, if reported.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the task-type reference, if any.
    #[must_use]
    pub const fn task_type_id(&self) -> Option<TaskTypeId> {
        self.task_type_id
    }

    /// Returns the creator reference, if any.
    #[must_use]
    pub const fn creator_id(&self) -> Option<UserId> {
        self.creator_id
    }

    /// Returns the owner reference; `None` when unassigned.
    #[must_use]
    pub const fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }
}

/// A task comment as returned by the remote service.
///
/// Depending on the endpoint the author arrives either as an id or as an
/// embedded user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteComment {
    id: CommentId,
    task_id: RemoteTaskId,
    body: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    author_id: Option<UserId>,
    #[serde(default)]
    author: Option<User>,
}

impl RemoteComment {
    /// Creates a comment record.
    #[must_use]
    pub fn new(id: CommentId, task_id: RemoteTaskId, body: impl Into<String>) -> Self {
        Self {
            id,
            task_id,
            body: body.into(),
            created_at: None,
            author_id: None,
            author: None,
        }
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the author reference.
    #[must_use]
    pub const fn with_author_id(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Embeds the author record.
    #[must_use]
    pub fn with_author(mut self, author: User) -> Self {
        self.author = Some(author);
        self
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> RemoteTaskId {
        self.task_id
    }

    /// Returns the comment body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the creation timestamp, if reported.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the author reference, if any.
    #[must_use]
    pub const fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Returns the embedded author, if any.
    #[must_use]
    pub const fn author(&self) -> Option<&User> {
        self.author.as_ref()
    }
}
