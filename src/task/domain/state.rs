//! Host task states and type categories.

use serde::{Deserialize, Serialize};

/// Task state in the host's task model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Work not finished.
    Open,
    /// Work under way.
    InProgress,
    /// Reopened after resolution.
    Reopened,
    /// Work finished.
    Resolved,
    /// Any other state.
    Other,
}

impl TaskState {
    /// Infers the state from the remote ready-to-pull flag.
    ///
    /// Only [`Self::Open`] and [`Self::Resolved`] can be told apart.
    #[must_use]
    pub const fn from_ready_to_pull(ready_to_pull: bool) -> Self {
        if ready_to_pull {
            Self::Resolved
        } else {
            Self::Open
        }
    }

    /// Returns the ready-to-pull flag a state update is sent as.
    ///
    /// Every state other than [`Self::Resolved`] collapses to "not ready",
    /// so a write followed by a read is lossy for those states.
    #[must_use]
    pub const fn ready_to_pull(self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Reopened => "reopened",
            Self::Resolved => "resolved",
            Self::Other => "other",
        }
    }
}

/// Task type category in the host's task model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Defect.
    Bug,
    /// Exception report.
    Exception,
    /// New feature.
    Feature,
    /// Anything else.
    Other,
}

impl TaskKind {
    /// Infers the category from the remote type label.
    ///
    /// Matching is exact and case-sensitive; unknown or absent labels map to
    /// [`Self::Other`].
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Bug") => Self::Bug,
            Some("Exception") => Self::Exception,
            Some("New Feature") => Self::Feature,
            _ => Self::Other,
        }
    }
}
