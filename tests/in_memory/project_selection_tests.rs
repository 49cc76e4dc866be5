//! Project picker flows and configuration-driven reconnects.

use super::helpers::{API_KEY, bound_config, repository, service};
use kanbanery_connector::connection::{
    adapters::InMemoryKanbaneryService,
    domain::{Credentials, RepositoryConfig, SessionStatus},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn picker_then_select_binds_chosen_project(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    service.add_project("acme", "roadmap")?;
    service.add_project("globex", "launch")?;
    let mut repo = repository(
        &service,
        RepositoryConfig::new().with_credentials(Credentials::api_key(API_KEY)),
    );
    eyre::ensure!(!repo.is_configured(), "no project selected yet");

    let entries = repo.list_displayable_projects().await?;
    eyre::ensure!(
        entries == ["acme/board", "acme/roadmap", "globex/launch"],
        "unexpected picker entries: {entries:?}"
    );
    let choice = entries
        .get(2)
        .ok_or_else(|| eyre::eyre!("missing picker entry"))?
        .clone();

    let changed = repo.select_project(&choice).await?;
    let tasks = repo.list_tasks().await?;

    eyre::ensure!(changed, "selection should change the configuration");
    eyre::ensure!(repo.is_configured(), "repository should be configured after selection");
    eyre::ensure!(tasks.is_empty(), "new project has no tasks");
    eyre::ensure!(
        repo.status()
            == SessionStatus::ProjectBound {
                workspace: "globex".to_owned(),
                project: "launch".to_owned(),
            },
        "expected session bound to globex/launch, found {:?}",
        repo.status()
    );
    eyre::ensure!(
        service.connect_count() == 2,
        "expected a second connect, found {}",
        service.connect_count()
    );
    eyre::ensure!(
        service.close_count() == 1,
        "expected the first session closed, found {} closes",
        service.close_count()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reselecting_current_project_keeps_session(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    let mut repo = repository(&service, bound_config());
    repo.list_tasks().await?;

    let changed = repo.select_project("acme/board").await?;
    repo.list_tasks().await?;

    eyre::ensure!(!changed, "same selection should not change the configuration");
    eyre::ensure!(
        service.connect_count() == 1,
        "expected a single connect, found {}",
        service.connect_count()
    );
    eyre::ensure!(service.close_count() == 0, "session should not be closed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_project_falls_back_to_picker(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    let repo = repository(
        &service,
        bound_config().with_project("acme", "archived"),
    );

    let tasks = repo.list_tasks().await;
    let entries = repo.list_displayable_projects().await?;

    eyre::ensure!(tasks.is_err(), "task listing needs a bound project");
    eyre::ensure!(entries == ["acme/board"], "unexpected picker entries: {entries:?}");
    eyre::ensure!(
        repo.status()
            == SessionStatus::WorkspaceOnly {
                workspace: Some("acme".to_owned()),
            },
        "expected workspace-only session, found {:?}",
        repo.status()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn persisted_configuration_restores_repository(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    let original = repository(&service, bound_config());
    let json = original.config().to_json()?;

    let restored = repository(&service, RepositoryConfig::from_json(&json)?);

    eyre::ensure!(restored.config() == original.config(), "restored configuration differs");
    eyre::ensure!(restored.config().has_api_key(), "restored configuration lost the API key");
    eyre::ensure!(
        restored.list_tasks().await?.len() == 3,
        "restored repository should list seeded tasks"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconnect_replaces_live_session(
    service: InMemoryKanbaneryService,
) -> Result<(), eyre::Report> {
    let repo = repository(&service, bound_config());
    repo.list_tasks().await?;
    let mut updates = repo.sessions().subscribe();

    let status = repo.reconnect().await?;

    eyre::ensure!(status.is_connected(), "reconnect should leave a live session, found {status:?}");
    eyre::ensure!(updates.has_changed()?, "subscribers should observe the reconnect");
    eyre::ensure!(
        service.connect_count() == 2,
        "expected a second connect, found {}",
        service.connect_count()
    );
    eyre::ensure!(
        service.close_count() == 1,
        "expected the first session closed, found {} closes",
        service.close_count()
    );
    Ok(())
}
