//! Application services for session lifecycle orchestration.

mod error;
mod manager;
mod session;

pub use error::{SessionError, SessionResult};
pub use manager::SessionManager;
pub use session::{Session, SessionId, SessionScope};
