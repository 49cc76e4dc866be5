//! Port contracts for reaching the remote service.
//!
//! Ports define infrastructure-agnostic interfaces used by session services.

pub mod transport;

pub use transport::{
    KanbaneryConnection, KanbaneryTransport, ProjectConnection, TransportError, TransportResult,
};
