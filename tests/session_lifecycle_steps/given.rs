//! Given steps for session lifecycle BDD scenarios.

use super::world::{SessionWorld, VALID_API_KEY, parse_selection};
use chrono::Utc;
use eyre::WrapErr;
use kanbanery_connector::{
    connection::domain::{Credentials, RepositoryConfig},
    task::domain::{RemoteTask, RemoteTaskId},
};
use rstest_bdd_macros::given;

#[given(r#"a Kanbanery service with project "{selection}" holding {count:usize} tasks"#)]
fn service_with_tasks(
    world: &mut SessionWorld,
    selection: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let target = parse_selection(&selection)?;
    let now = Utc::now();
    world
        .service
        .accept_api_key(VALID_API_KEY)
        .wrap_err("accept scenario API key")?;
    world
        .service
        .add_project(target.workspace(), target.project())
        .wrap_err("create scenario project")?;
    for id in 1..=u64::try_from(count)? {
        world
            .service
            .add_task(
                target.workspace(),
                target.project(),
                RemoteTask::new(RemoteTaskId::new(id), format!("Task {id}"))
                    .with_timestamps(now, now),
            )
            .wrap_err("seed scenario task")?;
    }
    Ok(())
}

#[given(r#"the service also hosts project "{selection}""#)]
fn service_hosts_project(world: &mut SessionWorld, selection: String) -> Result<(), eyre::Report> {
    let target = parse_selection(&selection)?;
    world
        .service
        .add_project(target.workspace(), target.project())
        .wrap_err("create additional project")?;
    Ok(())
}

#[given(r#"the repository is configured with a valid API key for "{selection}""#)]
fn configured_with_valid_key(
    world: &mut SessionWorld,
    selection: String,
) -> Result<(), eyre::Report> {
    configure(world, VALID_API_KEY, &selection)
}

#[given(r#"the repository is configured with API key "{key}" for "{selection}""#)]
fn configured_with_key(
    world: &mut SessionWorld,
    key: String,
    selection: String,
) -> Result<(), eyre::Report> {
    configure(world, &key, &selection)
}

fn configure(world: &mut SessionWorld, key: &str, selection: &str) -> Result<(), eyre::Report> {
    let target = parse_selection(selection)?;
    world.configure(
        RepositoryConfig::new()
            .with_credentials(Credentials::api_key(key))
            .with_project(target.workspace(), target.project()),
    );
    Ok(())
}
