//! Error types for task mapping.

use super::{CommentId, RemoteTaskId};
use thiserror::Error;

/// Errors returned while mapping remote records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    /// A task arrived without a required timestamp.
    #[error("task {task_id} has no {field} timestamp")]
    MissingTaskTimestamp {
        /// Offending task.
        task_id: RemoteTaskId,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A comment arrived without its creation timestamp.
    #[error("comment {comment_id} has no created_at timestamp")]
    MissingCommentTimestamp {
        /// Offending comment.
        comment_id: CommentId,
    },
}
