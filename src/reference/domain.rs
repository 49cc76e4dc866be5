//! Task-type and user records served by the remote service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when a task type cannot be resolved.
pub const UNKNOWN_TASK_TYPE_NAME: &str = "unknown";

/// Display name used when a user cannot be resolved.
pub const UNKNOWN_USER_NAME: &str = "Unknown user";

/// Display name of the unassigned-ownership sentinel.
pub const NO_ONE_NAME: &str = "No one";

/// Identifier of a task type within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTypeId(u64);

impl TaskTypeId {
    /// Wraps a raw task-type identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Identifier reserved for the "no one" sentinel.
    pub const NO_ONE: Self = Self(0);

    /// Wraps a raw user identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A column-independent task category defined per project ("Bug", "Story").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskType {
    id: TaskTypeId,
    name: String,
}

impl TaskType {
    /// Creates a task type record.
    #[must_use]
    pub fn new(id: TaskTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Placeholder returned for identifiers absent from the cache.
    #[must_use]
    pub fn unknown(id: TaskTypeId) -> Self {
        Self::new(id, UNKNOWN_TASK_TYPE_NAME)
    }

    /// Returns the task type identifier.
    #[must_use]
    pub const fn id(&self) -> TaskTypeId {
        self.id
    }

    /// Returns the task type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A user account as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    gravatar_url: Option<String>,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub fn new(id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            gravatar_url: None,
        }
    }

    /// Sets the e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the gravatar URL.
    #[must_use]
    pub fn with_gravatar_url(mut self, url: impl Into<String>) -> Self {
        self.gravatar_url = Some(url.into());
        self
    }

    /// Sentinel standing in for unassigned ownership.
    #[must_use]
    pub fn no_one() -> Self {
        Self::new(UserId::NO_ONE, NO_ONE_NAME, "")
    }

    /// Placeholder returned for identifiers absent from the cache.
    #[must_use]
    pub fn unknown(id: UserId) -> Self {
        Self::new(id, UNKNOWN_USER_NAME, "")
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the e-mail address, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the gravatar URL, if known.
    #[must_use]
    pub fn gravatar_url(&self) -> Option<&str> {
        self.gravatar_url.as_deref()
    }

    /// Returns `"first last"`, trimmed when either half is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Returns `true` for the unassigned-ownership sentinel.
    #[must_use]
    pub fn is_no_one(&self) -> bool {
        self.id == UserId::NO_ONE
    }
}
