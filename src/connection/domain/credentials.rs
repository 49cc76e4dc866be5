//! Mutually exclusive credential modes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Credentials used to authenticate against the remote service.
///
/// Exactly one mode is stored at a time; switching modes drops the other
/// mode's secret entirely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Credentials {
    /// Account login.
    UsernamePassword {
        /// Account login name.
        username: String,
        /// Account password, opaque to this crate.
        password: String,
    },
    /// Personal API token.
    ApiKey {
        /// Token value.
        key: String,
    },
}

impl Credentials {
    /// Creates API-key credentials.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey { key: key.into() }
    }

    /// Creates username/password credentials.
    #[must_use]
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::UsernamePassword {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` when the credentials carry enough to attempt a login.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::UsernamePassword { username, .. } => !username.is_empty(),
            Self::ApiKey { key } => !key.is_empty(),
        }
    }

    /// Returns `true` for the API-key mode.
    #[must_use]
    pub const fn is_api_key(&self) -> bool {
        matches!(self, Self::ApiKey { .. })
    }

    /// Returns the API key when in API-key mode.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ApiKey { key } => Some(key),
            Self::UsernamePassword { .. } => None,
        }
    }

    /// Returns the login name when in username/password mode.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::UsernamePassword { username, .. } => Some(username),
            Self::ApiKey { .. } => None,
        }
    }

    /// Returns the password when in username/password mode.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        match self {
            Self::UsernamePassword { password, .. } => Some(password),
            Self::ApiKey { .. } => None,
        }
    }

    pub(crate) fn digest_into(&self, hasher: &mut Sha256) {
        match self {
            Self::UsernamePassword { username, password } => {
                hasher.update(b"user");
                update_field(hasher, username);
                update_field(hasher, password);
            }
            Self::ApiKey { key } => {
                hasher.update(b"key");
                update_field(hasher, key);
            }
        }
    }
}

/// Feeds a length-prefixed field so adjacent fields cannot run together.
pub(crate) fn update_field(hasher: &mut Sha256, value: &str) {
    hasher.update(value.len().to_string());
    hasher.update(b":");
    hasher.update(value);
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernamePassword { username, .. } => formatter
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::ApiKey { .. } => formatter
                .debug_struct("ApiKey")
                .field("key", &"<redacted>")
                .finish(),
        }
    }
}
