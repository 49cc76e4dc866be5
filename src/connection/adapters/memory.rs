//! In-memory stand-in for the Kanbanery service.

use crate::connection::domain::{Credentials, Project, Workspace};
use crate::connection::ports::{
    KanbaneryConnection, KanbaneryTransport, ProjectConnection, TransportError, TransportResult,
};
use crate::reference::domain::{TaskType, User};
use crate::task::domain::{RemoteComment, RemoteTask, RemoteTaskId};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::{fmt, io};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory Kanbanery service.
///
/// This adapter models authentication, workspace/project resolution and task
/// updates without network access. It is suitable for unit and integration
/// tests and for local deterministic flows. Every handle it returns shares
/// the same state, so updates made through one session are visible to the
/// next.
///
/// Task updates are stamped with the injected clock.
pub struct InMemoryKanbaneryService<C = DefaultClock> {
    state: Arc<RwLock<ServiceState>>,
    counters: Arc<Counters>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryKanbaneryService<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            counters: Arc::clone(&self.counters),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryKanbaneryService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryKanbaneryService")
            .field("state", &self.state)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryKanbaneryService {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

#[derive(Debug, Default)]
struct Counters {
    connects: AtomicUsize,
    closes: AtomicUsize,
    reference_fetches: AtomicUsize,
}

#[derive(Debug, Default)]
struct ServiceState {
    api_keys: HashSet<String>,
    logins: HashMap<String, String>,
    workspaces: BTreeMap<String, WorkspaceState>,
    users: Vec<User>,
    unavailable: bool,
    reference_data_unavailable: bool,
}

#[derive(Debug, Default)]
struct WorkspaceState {
    projects: BTreeMap<String, ProjectState>,
}

#[derive(Debug, Default)]
struct ProjectState {
    tasks: BTreeMap<RemoteTaskId, RemoteTask>,
    comments: Vec<RemoteComment>,
    task_types: Vec<TaskType>,
}

impl ServiceState {
    fn project(&self, workspace: &str, project: &str) -> TransportResult<&ProjectState> {
        self.workspaces
            .get(workspace)
            .and_then(|found| found.projects.get(project))
            .ok_or_else(|| project_not_found(workspace, project))
    }

    fn project_mut(&mut self, workspace: &str, project: &str) -> TransportResult<&mut ProjectState> {
        self.workspaces
            .get_mut(workspace)
            .and_then(|found| found.projects.get_mut(project))
            .ok_or_else(|| project_not_found(workspace, project))
    }

    fn project_or_insert(&mut self, workspace: &str, project: &str) -> &mut ProjectState {
        self.workspaces
            .entry(workspace.to_owned())
            .or_default()
            .projects
            .entry(project.to_owned())
            .or_default()
    }

    fn ensure_available(&self) -> TransportResult<()> {
        if self.unavailable {
            return Err(TransportError::transport(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "Kanbanery service unavailable",
            )));
        }
        Ok(())
    }
}

fn project_not_found(workspace: &str, project: &str) -> TransportError {
    TransportError::ProjectNotFound {
        workspace: workspace.to_owned(),
        project: project.to_owned(),
    }
}

impl InMemoryKanbaneryService {
    /// Creates an empty service with no accounts, stamping updates with the
    /// system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock + 'static> InMemoryKanbaneryService<C> {
    /// Creates an empty service that stamps task updates with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::default(),
            counters: Arc::default(),
            clock,
        }
    }

    fn read(&self) -> TransportResult<RwLockReadGuard<'_, ServiceState>> {
        self.state
            .read()
            .map_err(|err| TransportError::transport(io::Error::other(err.to_string())))
    }

    fn write(&self) -> TransportResult<RwLockWriteGuard<'_, ServiceState>> {
        self.state
            .write()
            .map_err(|err| TransportError::transport(io::Error::other(err.to_string())))
    }

    /// Accepts an API key for authentication.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn accept_api_key(&self, key: impl Into<String>) -> TransportResult<()> {
        self.write()?.api_keys.insert(key.into());
        Ok(())
    }

    /// Accepts a username/password pair for authentication.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn accept_login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> TransportResult<()> {
        self.write()?.logins.insert(username.into(), password.into());
        Ok(())
    }

    /// Creates a project, and its workspace when missing.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn add_project(&self, workspace: &str, project: &str) -> TransportResult<()> {
        self.write()?.project_or_insert(workspace, project);
        Ok(())
    }

    /// Defines a task type in a project.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn add_task_type(
        &self,
        workspace: &str,
        project: &str,
        task_type: TaskType,
    ) -> TransportResult<()> {
        self.write()?
            .project_or_insert(workspace, project)
            .task_types
            .push(task_type);
        Ok(())
    }

    /// Stores a task, replacing any task with the same id.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn add_task(&self, workspace: &str, project: &str, task: RemoteTask) -> TransportResult<()> {
        self.write()?
            .project_or_insert(workspace, project)
            .tasks
            .insert(task.id(), task);
        Ok(())
    }

    /// Appends a comment to a project.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn add_comment(
        &self,
        workspace: &str,
        project: &str,
        comment: RemoteComment,
    ) -> TransportResult<()> {
        self.write()?
            .project_or_insert(workspace, project)
            .comments
            .push(comment);
        Ok(())
    }

    /// Registers a user account.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn add_user(&self, user: User) -> TransportResult<()> {
        self.write()?.users.push(user);
        Ok(())
    }

    /// Makes every call fail with a transport error while set.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_unavailable(&self, unavailable: bool) -> TransportResult<()> {
        self.write()?.unavailable = unavailable;
        Ok(())
    }

    /// Makes task-type and user listing fail while set.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_reference_data_unavailable(&self, unavailable: bool) -> TransportResult<()> {
        self.write()?.reference_data_unavailable = unavailable;
        Ok(())
    }

    /// Returns a stored task as the service currently holds it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ProjectNotFound`] for unknown projects and
    /// transport errors when lock acquisition fails.
    pub fn task(
        &self,
        workspace: &str,
        project: &str,
        id: RemoteTaskId,
    ) -> TransportResult<Option<RemoteTask>> {
        let state = self.read()?;
        Ok(state.project(workspace, project)?.tasks.get(&id).cloned())
    }

    /// Number of successful authentications.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }

    /// Number of connections closed.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    /// Number of task-type list requests served.
    #[must_use]
    pub fn reference_fetch_count(&self) -> usize {
        self.counters.reference_fetches.load(Ordering::SeqCst)
    }

    fn authenticate(&self, credentials: &Credentials) -> TransportResult<()> {
        let state = self.read()?;
        state.ensure_available()?;
        let accepted = match credentials {
            Credentials::ApiKey { key } => state.api_keys.contains(key),
            Credentials::UsernamePassword { username, password } => state
                .logins
                .get(username)
                .is_some_and(|expected| expected == password),
        };
        if accepted {
            Ok(())
        } else {
            Err(TransportError::Authentication(
                "invalid credentials".to_owned(),
            ))
        }
    }
}

#[async_trait]
impl<C: Clock + 'static> KanbaneryTransport for InMemoryKanbaneryService<C> {
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> TransportResult<Arc<dyn KanbaneryConnection>> {
        self.authenticate(credentials)?;
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(InMemoryConnection {
            service: self.clone(),
            closed: Arc::new(AtomicBool::new(false)),
        }))
    }
}

/// Workspace-level handle returned by [`InMemoryKanbaneryService`].
#[derive(Debug)]
struct InMemoryConnection<C> {
    service: InMemoryKanbaneryService<C>,
    closed: Arc<AtomicBool>,
}

impl<C> InMemoryConnection<C> {
    fn ensure_open(&self) -> TransportResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Clock + 'static> KanbaneryConnection for InMemoryConnection<C> {
    async fn bind_project(
        &self,
        workspace: &str,
        project: &str,
    ) -> TransportResult<Arc<dyn ProjectConnection>> {
        self.ensure_open()?;
        let state = self.service.read()?;
        state.ensure_available()?;
        if !state.workspaces.contains_key(workspace) {
            return Err(TransportError::WorkspaceNotFound(workspace.to_owned()));
        }
        state.project(workspace, project)?;
        Ok(Arc::new(InMemoryProjectConnection {
            service: self.service.clone(),
            workspace: workspace.to_owned(),
            project: project.to_owned(),
            closed: Arc::clone(&self.closed),
        }))
    }

    async fn list_workspaces(&self) -> TransportResult<Vec<Workspace>> {
        self.ensure_open()?;
        let state = self.service.read()?;
        state.ensure_available()?;
        Ok(state
            .workspaces
            .iter()
            .map(|(name, workspace)| {
                Workspace::new(name.clone(), workspace.projects.keys().map(Project::new))
            })
            .collect())
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.service.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Project-scoped handle sharing its parent connection's closed flag.
#[derive(Debug)]
struct InMemoryProjectConnection<C> {
    service: InMemoryKanbaneryService<C>,
    workspace: String,
    project: String,
    closed: Arc<AtomicBool>,
}

impl<C: Clock + 'static> InMemoryProjectConnection<C> {
    fn read(&self) -> TransportResult<RwLockReadGuard<'_, ServiceState>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        let state = self.service.read()?;
        state.ensure_available()?;
        Ok(state)
    }

    fn ensure_reference_data(state: &ServiceState) -> TransportResult<()> {
        if state.reference_data_unavailable {
            return Err(TransportError::transport(io::Error::new(
                io::ErrorKind::TimedOut,
                "reference data request timed out",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Clock + 'static> ProjectConnection for InMemoryProjectConnection<C> {
    async fn list_tasks(&self) -> TransportResult<Vec<RemoteTask>> {
        let state = self.read()?;
        let project = state.project(&self.workspace, &self.project)?;
        Ok(project.tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: RemoteTaskId) -> TransportResult<RemoteTask> {
        let state = self.read()?;
        let project = state.project(&self.workspace, &self.project)?;
        project
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TransportError::TaskNotFound(id))
    }

    async fn list_comments(&self, task_id: RemoteTaskId) -> TransportResult<Vec<RemoteComment>> {
        let state = self.read()?;
        let project = state.project(&self.workspace, &self.project)?;
        if !project.tasks.contains_key(&task_id) {
            return Err(TransportError::TaskNotFound(task_id));
        }
        Ok(project
            .comments
            .iter()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn mark_task(&self, id: RemoteTaskId, ready_to_pull: bool) -> TransportResult<()> {
        drop(self.read()?);
        let mut state = self.service.write()?;
        let project = state.project_mut(&self.workspace, &self.project)?;
        let task = project
            .tasks
            .get_mut(&id)
            .ok_or(TransportError::TaskNotFound(id))?;
        task.mark(ready_to_pull, self.service.clock.utc());
        Ok(())
    }

    async fn list_task_types(&self) -> TransportResult<Vec<TaskType>> {
        let state = self.read()?;
        Self::ensure_reference_data(&state)?;
        self.service
            .counters
            .reference_fetches
            .fetch_add(1, Ordering::SeqCst);
        Ok(state.project(&self.workspace, &self.project)?.task_types.clone())
    }

    async fn list_users(&self) -> TransportResult<Vec<User>> {
        let state = self.read()?;
        Self::ensure_reference_data(&state)?;
        Ok(state.users.clone())
    }
}
