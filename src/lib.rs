//! Kanbanery connector: task-tracker integration core.
//!
//! This crate connects a host task model to a Kanbanery project. It owns the
//! connection lifecycle, caches the project's task types and users, and maps
//! remote task and comment records into host-facing projections.
//!
//! # Architecture
//!
//! The connector follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the Kanbanery service
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`connection`]: Credentials, configuration and the session lifecycle
//! - [`reference`]: Copy-on-write task-type and user tables
//! - [`task`]: Task mapping and the host-facing repository surface

pub mod connection;
pub mod reference;
pub mod task;
