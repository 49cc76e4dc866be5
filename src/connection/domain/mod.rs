//! Domain model for repository configuration and session state.
//!
//! Nothing here talks to the network; these types describe what a session
//! should be connected to and what state it is in.

mod config;
mod credentials;
mod error;
mod status;
mod workspace;

pub use config::{ConnectionKey, PersistedRepositoryConfig, ProjectSelection, RepositoryConfig};
pub use credentials::Credentials;
pub use error::ConfigError;
pub use status::SessionStatus;
pub use workspace::{Project, Workspace};
