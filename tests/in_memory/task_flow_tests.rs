//! End-to-end task listing, lookup and state updates.

use super::helpers::{API_KEY, PROJECT, WORKSPACE, bound_config, repository, seeded_at, service};
use chrono::{DateTime, Utc};
use kanbanery_connector::{
    connection::adapters::InMemoryKanbaneryService,
    task::domain::{RemoteTaskId, TaskKind, TaskState},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lists_seeded_tasks_in_host_model(
    service: InMemoryKanbaneryService,
    seeded_at: DateTime<Utc>,
) -> Result<(), eyre::Report> {
    let repo = repository(&service, bound_config());

    let tasks = repo.list_tasks().await?;

    eyre::ensure!(tasks.len() == 3, "expected three tasks, found {}", tasks.len());
    let crash = tasks
        .iter()
        .find(|task| task.id() == "100")
        .ok_or_else(|| eyre::eyre!("task 100 missing"))?;
    eyre::ensure!(
        crash.presentable_name() == "[#100] (Bug): Crash on save",
        "unexpected name: {}",
        crash.presentable_name()
    );
    eyre::ensure!(crash.kind() == TaskKind::Bug, "bug label should map to bug kind");
    eyre::ensure!(crash.state() == TaskState::Open, "not-ready task should be open");
    eyre::ensure!(crash.creator().display_name() == "Alan Turing", "creator not resolved");
    eyre::ensure!(crash.owner().display_name() == "Ada Lovelace", "owner not resolved");
    eyre::ensure!(crash.created_at() == seeded_at, "creation time not carried over");
    eyre::ensure!(
        crash.comments_fragment().contains("Reproduced on 2.1"),
        "comment body missing from fragment"
    );

    let notes = tasks
        .iter()
        .find(|task| task.id() == "102")
        .ok_or_else(|| eyre::eyre!("task 102 missing"))?;
    eyre::ensure!(notes.state() == TaskState::Resolved, "ready task should be resolved");
    eyre::ensure!(
        notes.presentable_name() == "[#102] (unknown): Release notes",
        "unexpected name: {}",
        notes.presentable_name()
    );
    eyre::ensure!(notes.owner().is_no_one(), "unassigned task should be owned by no one");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolved_state_round_trips(service: InMemoryKanbaneryService) -> Result<(), eyre::Report> {
    let repo = repository(&service, bound_config());

    repo.set_task_state("101", TaskState::Resolved).await?;

    let stored = service
        .task(WORKSPACE, PROJECT, RemoteTaskId::new(101))?
        .ok_or_else(|| eyre::eyre!("task 101 missing from service"))?;
    eyre::ensure!(stored.ready_to_pull(), "service should hold ready-to-pull");
    let fetched = repo
        .find_task("101")
        .await?
        .ok_or_else(|| eyre::eyre!("task 101 not found"))?;
    eyre::ensure!(
        fetched.state() == TaskState::Resolved,
        "resolved state should read back as resolved"
    );
    Ok(())
}

#[rstest]
#[case(TaskState::InProgress)]
#[case(TaskState::Reopened)]
#[case(TaskState::Other)]
#[tokio::test(flavor = "multi_thread")]
async fn other_states_read_back_as_open(
    service: InMemoryKanbaneryService,
    #[case] state: TaskState,
) -> Result<(), eyre::Report> {
    let repo = repository(&service, bound_config());

    repo.set_task_state("102", state).await?;

    let fetched = repo
        .find_task("102")
        .await?
        .ok_or_else(|| eyre::eyre!("task 102 not found"))?;
    eyre::ensure!(
        fetched.state() == TaskState::Open,
        "expected open after writing {}, found {}",
        state.as_str(),
        fetched.state().as_str()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_share_one_connection(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    let repo = repository(&service, bound_config());

    repo.list_tasks().await?;
    repo.find_task("100").await?;
    repo.set_task_state("100", TaskState::Resolved).await?;
    repo.list_displayable_projects().await?;

    eyre::ensure!(service.connect_count() == 1, "expected a single connect");
    eyre::ensure!(
        service.reference_fetch_count() == 1,
        "expected a single reference load"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unavailable_service_recovers_on_next_call(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    let repo = repository(&service, bound_config());
    service.set_unavailable(true)?;

    let failed = repo.list_tasks().await;
    service.set_unavailable(false)?;
    let recovered = repo.list_tasks().await?;

    eyre::ensure!(failed.is_err(), "expected failure while unavailable");
    eyre::ensure!(recovered.len() == 3, "expected three tasks after recovery");
    eyre::ensure!(repo.status().is_connected(), "session should be live after recovery");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_key_never_lists_tasks(service: InMemoryKanbaneryService) {
    let mut repo = repository(&service, bound_config());
    assert!(repo.configure_api_key(format!("{API_KEY}-wrong")).await);

    let result = repo.list_tasks().await;

    assert!(result.is_err());
    assert_eq!(service.connect_count(), 0);
}
