//! A live, authorised connection and the reference data bound to it.

use super::{SessionError, SessionResult};
use crate::connection::domain::{ConnectionKey, ProjectSelection, SessionStatus};
use crate::connection::ports::{KanbaneryConnection, ProjectConnection};
use crate::reference::cache::{ReferenceCache, ReferenceSnapshot};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Sequence number distinguishing sessions opened by one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a session is resolved to.
#[derive(Clone)]
pub enum SessionScope {
    /// Bound to a workspace and project; task operations available.
    ProjectBound {
        /// The bound workspace/project.
        selection: ProjectSelection,
        /// Project-scoped handle.
        project: Arc<dyn ProjectConnection>,
    },
    /// Authenticated only; workspace and project enumeration available.
    WorkspaceOnly {
        /// Resolved workspace, when one was named.
        workspace: Option<String>,
    },
}

impl fmt::Debug for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectBound { selection, .. } => f
                .debug_struct("ProjectBound")
                .field("selection", selection)
                .finish_non_exhaustive(),
            Self::WorkspaceOnly { workspace } => f
                .debug_struct("WorkspaceOnly")
                .field("workspace", workspace)
                .finish(),
        }
    }
}

/// A live session handed out by the session manager.
///
/// Each session owns its own reference cache, so tables fetched for one
/// project never leak into a session bound to another.
pub struct Session {
    id: SessionId,
    key: ConnectionKey,
    connection: Arc<dyn KanbaneryConnection>,
    scope: SessionScope,
    reference: Arc<ReferenceCache>,
    reference_loaded: OnceCell<()>,
    connected_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(
        id: SessionId,
        key: ConnectionKey,
        connection: Arc<dyn KanbaneryConnection>,
        scope: SessionScope,
        connected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key,
            connection,
            scope,
            reference: Arc::new(ReferenceCache::new()),
            reference_loaded: OnceCell::new(),
            connected_at,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    pub(crate) const fn key(&self) -> &ConnectionKey {
        &self.key
    }

    /// Returns the workspace-level handle.
    #[must_use]
    pub fn connection(&self) -> &dyn KanbaneryConnection {
        self.connection.as_ref()
    }

    /// Returns the resolved scope.
    #[must_use]
    pub const fn scope(&self) -> &SessionScope {
        &self.scope
    }

    /// Returns `true` when a project is bound.
    #[must_use]
    pub const fn is_project_bound(&self) -> bool {
        matches!(self.scope, SessionScope::ProjectBound { .. })
    }

    /// Returns the project-scoped handle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ProjectNotBound`] for workspace-only sessions.
    pub fn project(&self) -> SessionResult<&dyn ProjectConnection> {
        match &self.scope {
            SessionScope::ProjectBound { project, .. } => Ok(project.as_ref()),
            SessionScope::WorkspaceOnly { .. } => Err(SessionError::ProjectNotBound),
        }
    }

    /// Returns the bound selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&ProjectSelection> {
        match &self.scope {
            SessionScope::ProjectBound { selection, .. } => Some(selection),
            SessionScope::WorkspaceOnly { .. } => None,
        }
    }

    /// Returns the session's reference cache.
    #[must_use]
    pub fn reference(&self) -> &ReferenceCache {
        &self.reference
    }

    /// Returns the current reference snapshot.
    #[must_use]
    pub fn reference_snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.reference.snapshot()
    }

    /// Returns when the session was opened.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Returns the status this session represents.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match &self.scope {
            SessionScope::ProjectBound { selection, .. } => SessionStatus::ProjectBound {
                workspace: selection.workspace().to_owned(),
                project: selection.project().to_owned(),
            },
            SessionScope::WorkspaceOnly { workspace } => SessionStatus::WorkspaceOnly {
                workspace: workspace.clone(),
            },
        }
    }

    /// Loads reference data once per project-bound session.
    ///
    /// The fetch runs on its own task so dropping the caller does not abort
    /// it. Concurrent callers wait for the same fetch. Failure leaves the
    /// cache empty and is not retried for this session.
    pub(crate) async fn ensure_reference_data<C>(&self, clock: &Arc<C>)
    where
        C: Clock + Send + Sync + 'static,
    {
        let SessionScope::ProjectBound { project, .. } = &self.scope else {
            return;
        };
        self.reference_loaded
            .get_or_init(|| async {
                let refresh = tokio::spawn(refresh_task(
                    Arc::clone(&self.reference),
                    Arc::clone(project),
                    Arc::clone(clock),
                ));
                match refresh.await {
                    Ok(Ok(())) => debug!(session_id = self.id.value(), "reference data loaded"),
                    Ok(Err(err)) => warn!(
                        session_id = self.id.value(),
                        error = %err,
                        "reference data unavailable; names fall back to placeholders"
                    ),
                    Err(err) => warn!(
                        session_id = self.id.value(),
                        error = %err,
                        "reference refresh task did not complete"
                    ),
                }
            })
            .await;
    }

    /// Re-fetches reference data for this session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ProjectNotBound`] for workspace-only sessions
    /// and the classified transport error when a fetch fails; the previous
    /// tables stay in place in that case.
    pub async fn refresh_reference_data(&self, clock: &impl Clock) -> SessionResult<()> {
        let project = self.project()?;
        self.reference.refresh(project, clock).await?;
        Ok(())
    }

    pub(crate) async fn close(&self) {
        self.connection.close().await;
    }
}

async fn refresh_task<C>(
    cache: Arc<ReferenceCache>,
    project: Arc<dyn ProjectConnection>,
    clock: Arc<C>,
) -> crate::connection::ports::TransportResult<()>
where
    C: Clock + Send + Sync + 'static,
{
    cache.refresh(project.as_ref(), clock.as_ref()).await
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}
