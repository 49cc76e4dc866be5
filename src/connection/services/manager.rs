//! Lazy session lifecycle over a host-owned repository configuration.

use super::{Session, SessionError, SessionId, SessionResult, SessionScope};
use crate::connection::domain::{ConnectionKey, RepositoryConfig, SessionStatus};
use crate::connection::ports::{KanbaneryConnection, KanbaneryTransport, TransportError};
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Internal session state machine.
///
/// `Connecting` outlives a call only when the connect future was dropped
/// mid-flight. It then holds whatever connection the transport had already
/// opened, so the next invalidation or connect attempt can close it.
enum SessionState {
    Disconnected,
    Connecting(Option<Arc<dyn KanbaneryConnection>>),
    Connected(Arc<Session>),
    Failed(SessionError),
}

/// Hands out the live session for a repository configuration.
///
/// The configuration is borrowed on every call and never stored. A session is
/// reused only while the configuration's [`ConnectionKey`] still matches the
/// one the session was opened with. State transitions run inside one async
/// mutex, so concurrent callers racing to connect end up sharing a single
/// session.
pub struct SessionManager<T, C>
where
    T: KanbaneryTransport,
    C: Clock + Send + Sync + 'static,
{
    transport: Arc<T>,
    clock: Arc<C>,
    state: Mutex<SessionState>,
    status: watch::Sender<SessionStatus>,
    last_session_id: AtomicU64,
}

impl<T, C> SessionManager<T, C>
where
    T: KanbaneryTransport,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a disconnected manager.
    #[must_use]
    pub fn new(transport: Arc<T>, clock: Arc<C>) -> Self {
        let (status, _initial_receiver) = watch::channel(SessionStatus::Disconnected);
        Self {
            transport,
            clock,
            state: Mutex::new(SessionState::Disconnected),
            status,
            last_session_id: AtomicU64::new(0),
        }
    }

    /// Returns the clock used for session timestamps.
    #[must_use]
    pub const fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Returns the current externally visible state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Returns the error that left the manager in the failed state, if any.
    pub async fn last_error(&self) -> Option<SessionError> {
        match &*self.state.lock().await {
            SessionState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Returns a live session consistent with `config`, connecting if needed.
    ///
    /// A project-bound session is only returned after its reference data
    /// load has been attempted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingCredentials`] when nothing usable is
    /// configured, and the classified transport failure otherwise. The
    /// manager is left in the failed state; the next call tries again.
    pub async fn obtain(&self, config: &RepositoryConfig) -> SessionResult<Arc<Session>> {
        let session = self.current_or_connect(config).await?;
        session.ensure_reference_data(&self.clock).await;
        Ok(session)
    }

    /// Closes the live session, if any, so the next access reconnects.
    ///
    /// Invalidating a disconnected manager does nothing.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, SessionState::Disconnected) {
            SessionState::Connected(session) => {
                info!(session_id = session.id().value(), "closing session");
                session.close().await;
                self.publish(SessionStatus::Disconnected);
            }
            SessionState::Connecting(Some(connection)) => {
                info!("closing connection left by an abandoned connect");
                connection.close().await;
                self.publish(SessionStatus::Disconnected);
            }
            SessionState::Failed(_) | SessionState::Connecting(None) => {
                self.publish(SessionStatus::Disconnected);
            }
            SessionState::Disconnected => {}
        }
    }

    /// Drops the live session and connects afresh.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::obtain`].
    pub async fn reconnect(&self, config: &RepositoryConfig) -> SessionResult<Arc<Session>> {
        self.invalidate().await;
        self.obtain(config).await
    }

    /// Re-fetches reference data for the live project-bound session.
    ///
    /// # Errors
    ///
    /// Returns session errors from [`Self::obtain`],
    /// [`SessionError::ProjectNotBound`] for workspace-only sessions, and the
    /// fetch failure; the previous tables are kept on failure.
    pub async fn refresh_reference_data(&self, config: &RepositoryConfig) -> SessionResult<()> {
        let session = self.obtain(config).await?;
        session.refresh_reference_data(&*self.clock).await
    }

    async fn current_or_connect(&self, config: &RepositoryConfig) -> SessionResult<Arc<Session>> {
        let key = config.connection_key();
        let mut state = self.state.lock().await;

        match &*state {
            SessionState::Connected(session) if session.key() == &key => {
                debug!(session_id = session.id().value(), "reusing live session");
                return Ok(Arc::clone(session));
            }
            SessionState::Connected(session) => {
                info!(
                    session_id = session.id().value(),
                    "configuration changed; closing stale session"
                );
                session.close().await;
            }
            SessionState::Connecting(Some(connection)) => {
                info!("closing connection left by an abandoned connect");
                connection.close().await;
            }
            SessionState::Connecting(None)
            | SessionState::Disconnected
            | SessionState::Failed(_) => {}
        }

        *state = SessionState::Connecting(None);
        self.publish(SessionStatus::Connecting);

        match self.connect(config, key, &mut state).await {
            Ok(opened) => {
                let session = Arc::new(opened);
                info!(
                    session_id = session.id().value(),
                    scope = ?session.scope(),
                    "session connected"
                );
                self.publish(session.status());
                *state = SessionState::Connected(Arc::clone(&session));
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "unable to connect to Kanbanery");
                self.publish(SessionStatus::Failed {
                    reason: err.to_string(),
                });
                *state = SessionState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Opens a connection and binds the configured project.
    ///
    /// The opened connection is parked in `state` while the project is being
    /// bound, so a caller dropping this future does not leak it.
    async fn connect(
        &self,
        config: &RepositoryConfig,
        key: ConnectionKey,
        state: &mut SessionState,
    ) -> SessionResult<Session> {
        let credentials = config
            .credentials()
            .filter(|credentials| credentials.is_present())
            .ok_or(SessionError::MissingCredentials)?;
        let connection = self.transport.connect(credentials).await?;
        *state = SessionState::Connecting(Some(Arc::clone(&connection)));
        let session_id = SessionId::new(self.last_session_id.fetch_add(1, Ordering::Relaxed) + 1);

        let scope = match config.project_selection() {
            None => {
                debug!(
                    session_id = session_id.value(),
                    "no project selected; connecting for project selection"
                );
                SessionScope::WorkspaceOnly {
                    workspace: non_empty(config.workspace()),
                }
            }
            Some(selection) => {
                match connection
                    .bind_project(selection.workspace(), selection.project())
                    .await
                {
                    Ok(project) => SessionScope::ProjectBound { selection, project },
                    Err(TransportError::ProjectNotFound { workspace, project }) => {
                        warn!(
                            session_id = session_id.value(),
                            workspace = %workspace,
                            project = %project,
                            "project not found; falling back to workspace-only session"
                        );
                        SessionScope::WorkspaceOnly {
                            workspace: Some(workspace),
                        }
                    }
                    Err(err) => {
                        *state = SessionState::Connecting(None);
                        connection.close().await;
                        return Err(err.into());
                    }
                }
            }
        };

        Ok(Session::new(
            session_id,
            key,
            connection,
            scope,
            self.clock.utc(),
        ))
    }

    fn publish(&self, status: SessionStatus) {
        self.status.send_modify(|current| *current = status);
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
