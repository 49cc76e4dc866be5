//! Copy-on-write lookup tables for task types and users.
//!
//! Readers take an [`Arc`] of the current [`ReferenceSnapshot`] and keep
//! using it for as long as they need; a refresh builds a complete new
//! snapshot off to the side and swaps the pointer in one step, so no reader
//! ever sees a table with only part of a refresh applied.

use crate::connection::ports::{ProjectConnection, TransportResult};
use crate::reference::domain::{TaskType, TaskTypeId, User, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Immutable task-type and user tables captured by one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSnapshot {
    task_types: HashMap<TaskTypeId, TaskType>,
    users: HashMap<UserId, User>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl ReferenceSnapshot {
    /// Builds a snapshot from fetched records.
    ///
    /// The "no one" sentinel is always present in the user table. When an
    /// identifier repeats, the first record wins.
    #[must_use]
    pub fn new(
        task_types: impl IntoIterator<Item = TaskType>,
        users: impl IntoIterator<Item = User>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        let mut type_table = HashMap::new();
        for task_type in task_types {
            let id = task_type.id();
            if type_table.contains_key(&id) {
                warn!(task_type_id = id.value(), "duplicate task type id in reference data");
                continue;
            }
            type_table.insert(id, task_type);
        }

        let mut user_table = HashMap::new();
        user_table.insert(UserId::NO_ONE, User::no_one());
        for user in users {
            let id = user.id();
            if id == UserId::NO_ONE {
                continue;
            }
            if user_table.contains_key(&id) {
                warn!(user_id = id.value(), "duplicate user id in reference data");
                continue;
            }
            user_table.insert(id, user);
        }

        Self {
            task_types: type_table,
            users: user_table,
            refreshed_at: Some(refreshed_at),
        }
    }

    /// Returns the cached task type or the "unknown" placeholder.
    #[must_use]
    pub fn task_type(&self, id: TaskTypeId) -> TaskType {
        self.task_types
            .get(&id)
            .cloned()
            .unwrap_or_else(|| TaskType::unknown(id))
    }

    /// Returns the display name for an optional task-type reference.
    #[must_use]
    pub fn task_type_name(&self, id: Option<TaskTypeId>) -> String {
        id.and_then(|type_id| self.task_types.get(&type_id))
            .map_or_else(
                || crate::reference::domain::UNKNOWN_TASK_TYPE_NAME.to_owned(),
                |task_type| task_type.name().to_owned(),
            )
    }

    /// Returns the cached user or the "unknown" placeholder.
    #[must_use]
    pub fn user(&self, id: UserId) -> User {
        self.users
            .get(&id)
            .cloned()
            .unwrap_or_else(|| User::unknown(id))
    }

    /// Resolves an ownership reference; no owner maps to the "no one" sentinel.
    #[must_use]
    pub fn owner(&self, id: Option<UserId>) -> User {
        id.map_or_else(User::no_one, |user_id| self.user(user_id))
    }

    /// Number of cached task types.
    #[must_use]
    pub fn task_type_count(&self) -> usize {
        self.task_types.len()
    }

    /// Number of cached users, the sentinel excluded.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users
            .keys()
            .filter(|id| **id != UserId::NO_ONE)
            .count()
    }

    /// Returns when the snapshot was fetched; `None` for the empty snapshot.
    #[must_use]
    pub const fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Returns `true` when no refresh has populated this snapshot.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.refreshed_at.is_none()
    }
}

/// Shared, atomically replaced reference tables.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    current: RwLock<Arc<ReferenceSnapshot>>,
}

impl ReferenceCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    ///
    /// The write lock is only ever held for a pointer swap, so this never
    /// waits on network I/O.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replaces the whole table set in one step.
    pub fn replace(&self, snapshot: ReferenceSnapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    /// Looks up a task type; never fails.
    #[must_use]
    pub fn lookup_task_type(&self, id: TaskTypeId) -> TaskType {
        self.snapshot().task_type(id)
    }

    /// Looks up a user; never fails.
    #[must_use]
    pub fn lookup_user(&self, id: UserId) -> User {
        self.snapshot().user(id)
    }

    /// Fetches task types and users and swaps them in.
    ///
    /// Both lists are fetched before anything is replaced; on failure the
    /// previous snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the first failing fetch.
    pub async fn refresh(
        &self,
        project: &dyn ProjectConnection,
        clock: &impl Clock,
    ) -> TransportResult<()> {
        let (task_types, users) = tokio::try_join!(project.list_task_types(), project.list_users())?;
        let snapshot = ReferenceSnapshot::new(task_types, users, clock.utc());
        debug!(
            task_types = snapshot.task_type_count(),
            users = snapshot.user_count(),
            "reference data refreshed"
        );
        self.replace(snapshot);
        Ok(())
    }
}
