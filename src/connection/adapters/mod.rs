//! Adapter implementations for the transport port.

pub mod memory;

pub use memory::InMemoryKanbaneryService;
