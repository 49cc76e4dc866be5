//! Shared test helpers for in-memory service integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use kanbanery_connector::{
    connection::{
        adapters::InMemoryKanbaneryService,
        domain::{Credentials, RepositoryConfig},
    },
    reference::domain::{TaskType, TaskTypeId, User, UserId},
    task::{
        domain::{CommentId, RemoteComment, RemoteTask, RemoteTaskId},
        services::KanbaneryRepository,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Repository type used across integration tests.
pub type TestRepository = KanbaneryRepository<InMemoryKanbaneryService, DefaultClock>;

/// API key the seeded service accepts.
pub const API_KEY: &str = "integration-key";

/// Workspace holding the seeded project.
pub const WORKSPACE: &str = "acme";

/// Seeded project with tasks.
pub const PROJECT: &str = "board";

/// Fixed timestamp used for seeded records.
#[fixture]
pub fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Provides a service seeded with one project, two task types, two users,
/// three tasks and a comment.
///
/// # Panics
///
/// Panics if seeding the in-memory service fails.
#[fixture]
pub fn service(seeded_at: DateTime<Utc>) -> InMemoryKanbaneryService {
    let service = InMemoryKanbaneryService::new();
    seed(&service, seeded_at).expect("seed in-memory service");
    service
}

fn seed(
    service: &InMemoryKanbaneryService,
    at: DateTime<Utc>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    service.accept_api_key(API_KEY)?;
    service.add_task_type(WORKSPACE, PROJECT, TaskType::new(TaskTypeId::new(1), "Bug"))?;
    service.add_task_type(
        WORKSPACE,
        PROJECT,
        TaskType::new(TaskTypeId::new(2), "New Feature"),
    )?;
    service.add_user(
        User::new(UserId::new(10), "Ada", "Lovelace")
            .with_email("ada@example.com")
            .with_gravatar_url("https://gravatar.example/ada"),
    )?;
    service.add_user(User::new(UserId::new(11), "Alan", "Turing"))?;

    service.add_task(
        WORKSPACE,
        PROJECT,
        RemoteTask::new(RemoteTaskId::new(100), "Crash on save")
            .with_type_label("Bug")
            .with_task_type(TaskTypeId::new(1))
            .with_creator(UserId::new(11))
            .with_owner(UserId::new(10))
            .with_description("Saving twice crashes the editor")
            .with_timestamps(at, at),
    )?;
    service.add_task(
        WORKSPACE,
        PROJECT,
        RemoteTask::new(RemoteTaskId::new(101), "Dark mode")
            .with_type_label("New Feature")
            .with_task_type(TaskTypeId::new(2))
            .with_creator(UserId::new(10))
            .with_timestamps(at, at),
    )?;
    service.add_task(
        WORKSPACE,
        PROJECT,
        RemoteTask::new(RemoteTaskId::new(102), "Release notes")
            .with_ready_to_pull(true)
            .with_timestamps(at, at),
    )?;
    service.add_comment(
        WORKSPACE,
        PROJECT,
        RemoteComment::new(
            CommentId::new(500),
            RemoteTaskId::new(100),
            "Reproduced on 2.1",
        )
        .with_created_at(at)
        .with_author_id(UserId::new(10)),
    )?;
    Ok(())
}

/// Returns a configuration bound to the seeded project.
#[must_use]
pub fn bound_config() -> RepositoryConfig {
    RepositoryConfig::new()
        .with_credentials(Credentials::api_key(API_KEY))
        .with_project(WORKSPACE, PROJECT)
}

/// Creates a repository over `service`.
#[must_use]
pub fn repository(service: &InMemoryKanbaneryService, config: RepositoryConfig) -> TestRepository {
    KanbaneryRepository::new(config, Arc::new(service.clone()), Arc::new(DefaultClock))
}
