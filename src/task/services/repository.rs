//! Host-facing surface for one Kanbanery repository.

use crate::connection::domain::{
    ConfigError, Credentials, PersistedRepositoryConfig, RepositoryConfig, SessionStatus,
};
use crate::connection::ports::{KanbaneryTransport, TransportError};
use crate::connection::services::{SessionError, SessionManager};
use crate::task::domain::{MappedTask, MappingError, RemoteTaskId, TaskState};
use crate::task::services::mapper::map_task;
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`KanbaneryRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Session could not be obtained or lacks a project.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Configuration input was malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A remote record could not be mapped.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A task id is not numeric.
    #[error("invalid task id '{0}'")]
    InvalidTaskId(String),
}

impl From<TransportError> for RepositoryError {
    fn from(value: TransportError) -> Self {
        Self::Session(SessionError::from(value))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// One configured Kanbanery repository as seen by the host.
///
/// Owns the configuration the host persists and a [`SessionManager`] that
/// borrows it. Every configuration change that alters the connection target
/// invalidates the live session.
pub struct KanbaneryRepository<T, C>
where
    T: KanbaneryTransport,
    C: Clock + Send + Sync + 'static,
{
    config: RepositoryConfig,
    sessions: SessionManager<T, C>,
}

impl<T, C> KanbaneryRepository<T, C>
where
    T: KanbaneryTransport,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a repository over a transport.
    #[must_use]
    pub fn new(config: RepositoryConfig, transport: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            config,
            sessions: SessionManager::new(transport, clock),
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Returns the configuration in its persisted layout.
    #[must_use]
    pub fn persisted_config(&self) -> PersistedRepositoryConfig {
        self.config.clone().into()
    }

    /// Returns the session manager.
    #[must_use]
    pub const fn sessions(&self) -> &SessionManager<T, C> {
        &self.sessions
    }

    /// Returns the current session state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.sessions.status()
    }

    /// Returns `true` when credentials are present and a project is selected.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Replaces the credentials; returns whether they changed.
    pub async fn configure_credentials(&mut self, credentials: Credentials) -> bool {
        let changed = self.config.set_credentials(credentials);
        self.invalidate_if(changed).await
    }

    /// Switches to API-key mode; returns whether the credentials changed.
    pub async fn configure_api_key(&mut self, key: impl Into<String>) -> bool {
        let changed = self.config.set_api_key(key);
        self.invalidate_if(changed).await
    }

    /// Switches to username/password mode; returns whether the credentials
    /// changed.
    pub async fn configure_username_password(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> bool {
        let changed = self.config.set_username_password(username, password);
        self.invalidate_if(changed).await
    }

    /// Sets the workspace and project; returns whether either changed.
    pub async fn configure_project(
        &mut self,
        workspace: impl Into<String>,
        project: impl Into<String>,
    ) -> bool {
        let changed = self.config.set_project(workspace, project);
        self.invalidate_if(changed).await
    }

    /// Applies a `workspace/project` entry from
    /// [`Self::list_displayable_projects`].
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Config`] when the entry is malformed.
    pub async fn select_project(&mut self, selection: &str) -> RepositoryResult<bool> {
        let changed = self.config.select_project(selection)?;
        Ok(self.invalidate_if(changed).await)
    }

    async fn invalidate_if(&self, changed: bool) -> bool {
        if changed {
            self.sessions.invalidate().await;
        }
        changed
    }

    /// Lists all tasks of the bound project with their comments.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ProjectNotBound`] (wrapped) when no project
    /// is bound, and session, transport or mapping errors otherwise.
    pub async fn list_tasks(&self) -> RepositoryResult<Vec<MappedTask>> {
        let session = self.sessions.obtain(&self.config).await?;
        let project = session.project()?;
        let reference = session.reference_snapshot();

        let remote_tasks = project.list_tasks().await?;
        let mut tasks = Vec::with_capacity(remote_tasks.len());
        for remote in &remote_tasks {
            let comments = project.list_comments(remote.id()).await?;
            tasks.push(map_task(remote, &comments, &reference)?);
        }
        Ok(tasks)
    }

    /// Fetches one task with its comments.
    ///
    /// Returns `Ok(None)` when the task does not exist or the id is not
    /// numeric.
    ///
    /// # Errors
    ///
    /// Returns session, transport or mapping errors.
    pub async fn find_task(&self, id: &str) -> RepositoryResult<Option<MappedTask>> {
        let Ok(task_id) = id.parse::<RemoteTaskId>() else {
            debug!(task_id = id, "ignoring lookup of non-numeric task id");
            return Ok(None);
        };
        let session = self.sessions.obtain(&self.config).await?;
        let project = session.project()?;

        let remote = match project.get_task(task_id).await {
            Ok(found) => found,
            Err(TransportError::TaskNotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let comments = project.list_comments(task_id).await?;
        let reference = session.reference_snapshot();
        Ok(Some(map_task(&remote, &comments, &reference)?))
    }

    /// Updates a task's state.
    ///
    /// Only [`TaskState::Resolved`] is sent as "ready to pull"; every other
    /// state is sent as "not ready to pull".
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidTaskId`] for non-numeric ids and
    /// session or transport errors otherwise.
    pub async fn set_task_state(&self, id: &str, state: TaskState) -> RepositoryResult<()> {
        let task_id = id
            .parse::<RemoteTaskId>()
            .map_err(|_| RepositoryError::InvalidTaskId(id.to_owned()))?;
        let session = self.sessions.obtain(&self.config).await?;
        session
            .project()?
            .mark_task(task_id, state.ready_to_pull())
            .await?;
        debug!(
            task_id = task_id.value(),
            state = state.as_str(),
            "task state updated"
        );
        Ok(())
    }

    /// Lists every visible project as a `workspace/project` entry.
    ///
    /// Works without a bound project. Duplicate pairs are reported once, in
    /// first-seen order.
    ///
    /// # Errors
    ///
    /// Returns session or transport errors.
    pub async fn list_displayable_projects(&self) -> RepositoryResult<Vec<String>> {
        let session = self.sessions.obtain(&self.config).await?;
        let workspaces = session.connection().list_workspaces().await?;

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for workspace in &workspaces {
            for project in workspace.projects() {
                let entry = format!("{}/{}", workspace.name(), project.name());
                if seen.insert(entry.clone()) {
                    entries.push(entry);
                }
            }
        }
        Ok(entries)
    }

    /// Closes the live session and connects again.
    ///
    /// # Errors
    ///
    /// Returns the session error of the new connect attempt.
    pub async fn reconnect(&self) -> RepositoryResult<SessionStatus> {
        let session = self.sessions.reconnect(&self.config).await?;
        Ok(session.status())
    }

    /// Re-fetches task types and users for the live session.
    ///
    /// # Errors
    ///
    /// Returns session or transport errors; the previous tables are kept.
    pub async fn refresh_reference_data(&self) -> RepositoryResult<()> {
        self.sessions.refresh_reference_data(&self.config).await?;
        Ok(())
    }
}
