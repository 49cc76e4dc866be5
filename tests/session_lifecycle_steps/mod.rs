//! Step definitions for session lifecycle scenarios.

mod given;
mod then;
pub mod world;
