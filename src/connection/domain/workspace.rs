//! Workspaces and the projects they group.

use serde::{Deserialize, Serialize};

/// A project board within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    name: String,
}

impl Project {
    /// Creates a project record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Top-level grouping of projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    name: String,
    #[serde(default)]
    projects: Vec<Project>,
}

impl Workspace {
    /// Creates a workspace with its projects.
    #[must_use]
    pub fn new(name: impl Into<String>, projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            name: name.into(),
            projects: projects.into_iter().collect(),
        }
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the projects in this workspace.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}
