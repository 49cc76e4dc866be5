//! Shared world state for session lifecycle BDD scenarios.

use std::sync::Arc;

use kanbanery_connector::{
    connection::{
        adapters::InMemoryKanbaneryService,
        domain::{ProjectSelection, RepositoryConfig},
    },
    task::{
        domain::MappedTask,
        services::{KanbaneryRepository, RepositoryError},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Repository type used by the BDD world.
pub type TestRepository = KanbaneryRepository<InMemoryKanbaneryService, DefaultClock>;

/// API key the scenario service accepts.
pub const VALID_API_KEY: &str = "scenario-key";

/// Scenario world for session lifecycle behaviour tests.
pub struct SessionWorld {
    pub service: InMemoryKanbaneryService,
    pub repository: Option<TestRepository>,
    pub last_list_result: Option<Result<Vec<MappedTask>, RepositoryError>>,
    pub last_projects_result: Option<Result<Vec<String>, RepositoryError>>,
}

impl SessionWorld {
    /// Creates a world with an empty service and no repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: InMemoryKanbaneryService::new(),
            repository: None,
            last_list_result: None,
            last_projects_result: None,
        }
    }

    /// Creates the repository under test.
    pub fn configure(&mut self, config: RepositoryConfig) {
        self.repository = Some(KanbaneryRepository::new(
            config,
            Arc::new(self.service.clone()),
            Arc::new(DefaultClock),
        ));
    }

    /// Returns the repository under test.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration step has run.
    pub fn repository(&self) -> Result<&TestRepository, eyre::Report> {
        self.repository
            .as_ref()
            .ok_or_else(|| eyre::eyre!("repository not configured in scenario world"))
    }

    /// Returns the repository under test for configuration changes.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration step has run.
    pub fn repository_mut(&mut self) -> Result<&mut TestRepository, eyre::Report> {
        self.repository
            .as_mut()
            .ok_or_else(|| eyre::eyre!("repository not configured in scenario world"))
    }
}

impl Default for SessionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SessionWorld {
    SessionWorld::default()
}

/// Parses a `workspace/project` step argument.
///
/// # Errors
///
/// Returns an error if the argument is malformed.
pub fn parse_selection(selection: &str) -> Result<ProjectSelection, eyre::Report> {
    selection
        .parse()
        .map_err(|err| eyre::eyre!("invalid selection '{selection}': {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
