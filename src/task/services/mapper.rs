//! Pure conversions from remote records to the host task model.
//!
//! Every function here is side-effect free. Reference lookups never fail:
//! an unresolved task type or user degrades to a placeholder. Missing
//! timestamps are the only mapping errors.

use crate::reference::cache::ReferenceSnapshot;
use crate::reference::domain::UNKNOWN_USER_NAME;
use crate::task::domain::{
    MappedComment, MappedTask, MappedTaskParts, MappingError, RemoteComment, RemoteTask,
    TaskKind, TaskState,
};

/// Builds the `[#id] (type): title` display name.
#[must_use]
pub fn presentable_name(task: &RemoteTask, reference: &ReferenceSnapshot) -> String {
    format!(
        "[#{}] ({}): {}",
        task.id(),
        reference.task_type_name(task.task_type_id()),
        task.title()
    )
}

/// Maps a comment, resolving its author.
///
/// An embedded author record wins over an author id; a comment with neither,
/// or with an id the cache does not know, renders with a placeholder author.
///
/// # Errors
///
/// Returns [`MappingError::MissingCommentTimestamp`] when the comment has no
/// creation time.
pub fn map_comment(
    comment: &RemoteComment,
    reference: &ReferenceSnapshot,
) -> Result<MappedComment, MappingError> {
    let created_at = comment
        .created_at()
        .ok_or(MappingError::MissingCommentTimestamp {
            comment_id: comment.id(),
        })?;

    let author = match (comment.author(), comment.author_id()) {
        (Some(embedded), _) => Some(embedded.clone()),
        (None, Some(author_id)) => Some(reference.user(author_id)),
        (None, None) => None,
    };
    let (name, avatar_url) = author.map_or_else(
        || (UNKNOWN_USER_NAME.to_owned(), None),
        |user| {
            (
                user.display_name(),
                user.gravatar_url().map(ToOwned::to_owned),
            )
        },
    );

    Ok(MappedComment::new(name, avatar_url, created_at, comment.body()))
}

/// Maps a task and its comments.
///
/// # Errors
///
/// Returns [`MappingError`] when the task or any comment lacks a timestamp.
pub fn map_task(
    task: &RemoteTask,
    comments: &[RemoteComment],
    reference: &ReferenceSnapshot,
) -> Result<MappedTask, MappingError> {
    let created_at = task
        .created_at()
        .ok_or(MappingError::MissingTaskTimestamp {
            task_id: task.id(),
            field: "created_at",
        })?;
    let updated_at = task
        .updated_at()
        .ok_or(MappingError::MissingTaskTimestamp {
            task_id: task.id(),
            field: "updated_at",
        })?;
    let mapped_comments = comments
        .iter()
        .map(|comment| map_comment(comment, reference))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MappedTask::from_parts(MappedTaskParts {
        remote_id: task.id(),
        summary: task.title().to_owned(),
        presentable_name: presentable_name(task, reference),
        description: task.description().unwrap_or_default().to_owned(),
        state: TaskState::from_ready_to_pull(task.ready_to_pull()),
        kind: TaskKind::from_label(task.type_label()),
        type_name: reference.task_type_name(task.task_type_id()),
        creator: reference.owner(task.creator_id()),
        owner: reference.owner(task.owner_id()),
        created_at,
        updated_at,
        comments: mapped_comments,
    }))
}
