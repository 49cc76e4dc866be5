//! Then steps for session lifecycle BDD scenarios.

use super::world::{SessionWorld, run_async};
use kanbanery_connector::{
    connection::{domain::SessionStatus, services::SessionError},
    task::{domain::TaskState, services::RepositoryError},
};
use rstest_bdd_macros::then;

#[then("{count:usize} tasks are returned")]
fn tasks_returned(world: &SessionWorld, count: usize) -> Result<(), eyre::Report> {
    let result = world
        .last_list_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing list result in scenario world"))?;
    let tasks = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected listing failure: {err}"))?;

    if tasks.len() != count {
        return Err(eyre::eyre!("expected {count} tasks, found {}", tasks.len()));
    }
    Ok(())
}

#[then("the service recorded {count:usize} logins")]
fn service_recorded_logins(world: &SessionWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.service.connect_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} logins, found {actual}"));
    }
    Ok(())
}

#[then("the closed session count is {count:usize}")]
fn closed_session_count(world: &SessionWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.service.close_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} closed sessions, found {actual}"));
    }
    Ok(())
}

#[then(r#"the picker offers "{entry}""#)]
fn picker_offers(world: &SessionWorld, entry: String) -> Result<(), eyre::Report> {
    let result = world
        .last_projects_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project list in scenario world"))?;
    let entries = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected project listing failure: {err}"))?;

    if !entries.contains(&entry) {
        return Err(eyre::eyre!("expected '{entry}' among {entries:?}"));
    }
    Ok(())
}

#[then("the session is workspace-only")]
fn session_is_workspace_only(world: &SessionWorld) -> Result<(), eyre::Report> {
    let status = world.repository()?.status();
    if !matches!(status, SessionStatus::WorkspaceOnly { .. }) {
        return Err(eyre::eyre!("expected workspace-only session, found {status:?}"));
    }
    Ok(())
}

#[then("listing fails with an authentication error")]
fn listing_fails_with_authentication(world: &SessionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_list_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing list result in scenario world"))?;

    if !matches!(
        result,
        Err(RepositoryError::Session(SessionError::Authentication(_)))
    ) {
        return Err(eyre::eyre!(
            "expected authentication failure, found {result:?}"
        ));
    }
    Ok(())
}

#[then("the session state is failed")]
fn session_state_failed(world: &SessionWorld) -> Result<(), eyre::Report> {
    let status = world.repository()?.status();
    if !matches!(status, SessionStatus::Failed { .. }) {
        return Err(eyre::eyre!("expected failed session, found {status:?}"));
    }
    Ok(())
}

#[then(r#"task "{id}" reads back as resolved"#)]
fn task_reads_back_resolved(world: &SessionWorld, id: String) -> Result<(), eyre::Report> {
    let task = run_async(world.repository()?.find_task(&id))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task {id} not found"))?;

    if task.state() != TaskState::Resolved {
        return Err(eyre::eyre!(
            "expected resolved state, found {}",
            task.state().as_str()
        ));
    }
    Ok(())
}
