//! Transport port for authenticated calls to the Kanbanery API.
//!
//! Wire-level retries and timeouts belong to implementations of these
//! traits. The contract is layered the way the service is: authenticate
//! first, then optionally bind a workspace/project to reach task data.

use crate::connection::domain::{Credentials, Workspace};
use crate::reference::domain::{TaskType, User};
use crate::task::domain::{RemoteComment, RemoteTask, RemoteTaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Entry point that turns credentials into an authenticated connection.
#[async_trait]
pub trait KanbaneryTransport: Send + Sync {
    /// Authenticates and returns a workspace-level connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Authentication`] for rejected credentials
    /// and [`TransportError::Transport`] for network failures.
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> TransportResult<Arc<dyn KanbaneryConnection>>;
}

/// An authenticated connection not yet scoped to a project.
#[async_trait]
pub trait KanbaneryConnection: Send + Sync {
    /// Resolves a workspace and project and returns a bound handle.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ProjectNotFound`] when the workspace exists
    /// but the project does not, and [`TransportError::WorkspaceNotFound`]
    /// when the workspace itself is unknown.
    async fn bind_project(
        &self,
        workspace: &str,
        project: &str,
    ) -> TransportResult<Arc<dyn ProjectConnection>>;

    /// Lists every workspace visible to the account with its projects.
    async fn list_workspaces(&self) -> TransportResult<Vec<Workspace>>;

    /// Releases transport resources. Closing twice is harmless.
    async fn close(&self);
}

/// A connection bound to one project.
#[async_trait]
pub trait ProjectConnection: Send + Sync {
    /// Lists all tasks of the project.
    async fn list_tasks(&self) -> TransportResult<Vec<RemoteTask>>;

    /// Fetches a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::TaskNotFound`] when no such task exists.
    async fn get_task(&self, id: RemoteTaskId) -> TransportResult<RemoteTask>;

    /// Lists the comments of a task.
    async fn list_comments(&self, task_id: RemoteTaskId) -> TransportResult<Vec<RemoteComment>>;

    /// Sets the ready-to-pull flag of a task.
    async fn mark_task(&self, id: RemoteTaskId, ready_to_pull: bool) -> TransportResult<()>;

    /// Lists the task types defined for the project.
    async fn list_task_types(&self) -> TransportResult<Vec<TaskType>>;

    /// Lists the users with access to the project.
    async fn list_users(&self) -> TransportResult<Vec<User>>;
}

/// Errors returned by transport adapters.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The service rejected the credentials.
    #[error("authentication rejected: {0}")]
    Authentication(String),

    /// The named workspace is not visible to the account.
    #[error("workspace '{0}' not found")]
    WorkspaceNotFound(String),

    /// The workspace exists but has no project with this name.
    #[error("project '{project}' not found in workspace '{workspace}'")]
    ProjectNotFound {
        /// Workspace that was searched.
        workspace: String,
        /// Project that was not found.
        project: String,
    },

    /// A single-task lookup missed.
    #[error("task {0} not found")]
    TaskNotFound(RemoteTaskId),

    /// The handle was used after it was closed.
    #[error("connection is closed")]
    Closed,

    /// Network or protocol failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps a network or protocol error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
