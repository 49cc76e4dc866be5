//! Observable session state.

/// Externally visible state of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No live handle.
    #[default]
    Disconnected,
    /// Authentication and workspace/project resolution in progress.
    Connecting,
    /// Bound to a workspace and project; reference data requested.
    ProjectBound {
        /// Bound workspace name.
        workspace: String,
        /// Bound project name.
        project: String,
    },
    /// Authenticated, but no project is bound.
    WorkspaceOnly {
        /// Resolved workspace, when one was named.
        workspace: Option<String>,
    },
    /// The last connect attempt failed.
    Failed {
        /// Display form of the failure.
        reason: String,
    },
}

impl SessionStatus {
    /// Returns `true` for either connected state.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::ProjectBound { .. } | Self::WorkspaceOnly { .. })
    }
}
