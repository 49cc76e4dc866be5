//! Service-level errors for session lifecycle operations.

use crate::connection::ports::TransportError;
use thiserror::Error;

/// Errors surfaced by the session manager.
///
/// Transport failures are classified on the way in, so callers can tell bad
/// credentials from an unreachable service without inspecting messages.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Neither an API key nor a username is configured.
    #[error("no credentials configured")]
    MissingCredentials,

    /// The service rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The configured workspace does not exist.
    #[error("workspace '{0}' not found")]
    WorkspaceNotFound(String),

    /// The operation needs a project-bound session.
    #[error("session is not bound to a project")]
    ProjectNotBound,

    /// Network or protocol failure.
    #[error(transparent)]
    Transport(TransportError),
}

impl From<TransportError> for SessionError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Authentication(reason) => Self::Authentication(reason),
            TransportError::WorkspaceNotFound(workspace) => Self::WorkspaceNotFound(workspace),
            other => Self::Transport(other),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
