//! Reference data for enriching remote task records.
//!
//! Task types and users are only used for presentation: a missing entry
//! degrades a display name to a placeholder and never fails an operation.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The copy-on-write lookup cache in [`cache`]

pub mod cache;
pub mod domain;
