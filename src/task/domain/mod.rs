//! Domain model for remote and host-facing task records.

mod error;
mod ids;
mod mapped;
mod remote;
mod state;

pub use error::MappingError;
pub use ids::{CommentId, RemoteTaskId};
pub use mapped::{COMMENT_DATE_FORMAT, MappedComment, MappedTask, MappedTaskParts, issue_url};
pub use remote::{RemoteComment, RemoteTask};
pub use state::{TaskKind, TaskState};
