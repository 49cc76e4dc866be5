//! Task mapping and the host-facing repository surface.

pub mod mapper;
mod repository;

pub use repository::{KanbaneryRepository, RepositoryError, RepositoryResult};
