//! Task listing, lookup and state updates in the host's task model.
//!
//! Raw records from the remote service are combined with reference data
//! into [`domain::MappedTask`] values by the pure functions in
//! [`services::mapper`]. [`services::KanbaneryRepository`] is the surface
//! the host calls. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Mapping and host-facing services in [`services`]

pub mod domain;
pub mod services;
