//! Host-owned repository configuration and its persisted form.

use super::{ConfigError, Credentials};
use super::credentials::update_field;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A committed `workspace/project` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectSelection {
    workspace: String,
    project: String,
}

impl ProjectSelection {
    /// Creates a selection from non-empty names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSelection`] when either name is empty.
    pub fn new(
        workspace: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let workspace_name = workspace.into();
        let project_name = project.into();
        if workspace_name.is_empty() || project_name.is_empty() {
            return Err(ConfigError::InvalidSelection(format!(
                "{workspace_name}/{project_name}"
            )));
        }
        Ok(Self {
            workspace: workspace_name,
            project: project_name,
        })
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Returns the project name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }
}

impl FromStr for ProjectSelection {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSelection(value.to_owned());
        let (workspace, project) = value.split_once('/').ok_or_else(invalid)?;
        if project.contains('/') {
            return Err(invalid());
        }
        Self::new(workspace, project).map_err(|_| invalid())
    }
}

impl fmt::Display for ProjectSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace, self.project)
    }
}

/// Fingerprint of everything a session depends on.
///
/// Two configurations with equal keys can share a session. The key is a
/// SHA-256 digest, so holding it does not retain a copy of the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey(Vec<u8>);

impl fmt::Debug for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectionKey(")?;
        for byte in self.0.iter().take(4) {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("..)")
    }
}

/// Connection settings for one Kanbanery repository.
///
/// Empty workspace or project names mean "not yet selected".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersistedRepositoryConfig", into = "PersistedRepositoryConfig")]
pub struct RepositoryConfig {
    workspace: String,
    project: String,
    credentials: Option<Credentials>,
}

impl RepositoryConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the workspace and project names.
    #[must_use]
    pub fn with_project(mut self, workspace: impl Into<String>, project: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self.project = project.into();
        self
    }

    /// Returns the workspace name; empty when unselected.
    #[must_use]
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Returns the project name; empty when unselected.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the stored credentials, if any.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns `true` when the API-key mode is selected.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.credentials.as_ref().is_some_and(Credentials::is_api_key)
    }

    /// Switches to API-key mode, dropping any username and password.
    ///
    /// Returns `true` when the effective credentials changed.
    pub fn set_api_key(&mut self, key: impl Into<String>) -> bool {
        self.set_credentials(Credentials::api_key(key))
    }

    /// Switches to username/password mode, dropping any API key.
    ///
    /// Returns `true` when the effective credentials changed.
    pub fn set_username_password(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> bool {
        self.set_credentials(Credentials::username_password(username, password))
    }

    /// Replaces the credentials wholesale.
    ///
    /// Returns `true` when the new value differs from the stored one.
    pub fn set_credentials(&mut self, credentials: Credentials) -> bool {
        let changed = self.credentials.as_ref() != Some(&credentials);
        self.credentials = Some(credentials);
        changed
    }

    /// Sets the workspace and project names.
    ///
    /// Returns `true` when either name changed.
    pub fn set_project(&mut self, workspace: impl Into<String>, project: impl Into<String>) -> bool {
        let workspace_name = workspace.into();
        let project_name = project.into();
        let changed = self.workspace != workspace_name || self.project != project_name;
        self.workspace = workspace_name;
        self.project = project_name;
        changed
    }

    /// Applies a `workspace/project` picker entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSelection`] when the entry is malformed;
    /// the configuration is left untouched.
    pub fn select_project(&mut self, selection: &str) -> Result<bool, ConfigError> {
        let parsed: ProjectSelection = selection.parse()?;
        Ok(self.set_project(parsed.workspace, parsed.project))
    }

    /// Returns the committed selection when both names are set.
    #[must_use]
    pub fn project_selection(&self) -> Option<ProjectSelection> {
        ProjectSelection::new(self.workspace.clone(), self.project.clone()).ok()
    }

    /// Returns the `workspace/project` picker entry for the selection.
    #[must_use]
    pub fn selected_item(&self) -> Option<String> {
        self.project_selection().map(|selection| selection.to_string())
    }

    /// Returns `true` when credentials are present and a project is selected.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials.as_ref().is_some_and(Credentials::is_present)
            && !self.workspace.is_empty()
            && !self.project.is_empty()
    }

    /// Computes the fingerprint a live session is compared against.
    #[must_use]
    pub fn connection_key(&self) -> ConnectionKey {
        let mut hasher = Sha256::new();
        match &self.credentials {
            Some(credentials) => credentials.digest_into(&mut hasher),
            None => hasher.update(b"none"),
        }
        update_field(&mut hasher, &self.workspace);
        update_field(&mut hasher, &self.project);
        ConnectionKey(hasher.finalize().to_vec())
    }

    /// Encodes the persisted form as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialization`] when encoding fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|err| ConfigError::Serialization(err.to_string()))
    }

    /// Decodes the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialization`] when the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Serialization(err.to_string()))
    }
}

impl fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("workspace", &self.workspace)
            .field("project", &self.project)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Flat persisted layout; empty strings mean unset.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedRepositoryConfig {
    /// Workspace name.
    pub workspace: String,
    /// Project name.
    pub project: String,
    /// API key.
    pub api_key: String,
    /// Login name.
    pub username: String,
    /// Password, encrypted by the host.
    pub password: String,
}

impl fmt::Debug for PersistedRepositoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedRepositoryConfig")
            .field("workspace", &self.workspace)
            .field("project", &self.project)
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<PersistedRepositoryConfig> for RepositoryConfig {
    fn from(value: PersistedRepositoryConfig) -> Self {
        let credentials = if !value.api_key.is_empty() {
            Some(Credentials::api_key(value.api_key))
        } else if !value.username.is_empty() {
            Some(Credentials::username_password(value.username, value.password))
        } else {
            None
        };
        Self {
            workspace: value.workspace,
            project: value.project,
            credentials,
        }
    }
}

impl From<RepositoryConfig> for PersistedRepositoryConfig {
    fn from(value: RepositoryConfig) -> Self {
        let mut persisted = Self {
            workspace: value.workspace,
            project: value.project,
            ..Self::default()
        };
        match value.credentials {
            Some(Credentials::ApiKey { key }) => persisted.api_key = key,
            Some(Credentials::UsernamePassword { username, password }) => {
                persisted.username = username;
                persisted.password = password;
            }
            None => {}
        }
        persisted
    }
}
