//! Authenticated connection lifecycle for the Kanbanery service.
//!
//! The repository configuration (credentials plus the selected
//! workspace/project) is owned by the host. The [`services::SessionManager`]
//! reads it on every access, opens a session lazily, and tears the session
//! down whenever the configuration it was opened with no longer matches.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
