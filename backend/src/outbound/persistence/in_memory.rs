//! In-memory exploration store guarded by a single `RwLock`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::table::ExplorationTable;
use crate::domain::ports::{ExplorationRepository, ExplorationRepositoryError};
use crate::domain::{Exploration, ExplorationDraft, ExplorationId, UserId};

fn poisoned<T>(_: PoisonError<T>) -> ExplorationRepositoryError {
    ExplorationRepositoryError::storage("exploration store lock poisoned")
}

/// Process-local exploration store.
///
/// # Examples
/// ```
/// use chronograf::domain::ports::ExplorationRepository;
/// use chronograf::outbound::persistence::InMemoryExplorationRepository;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let store = InMemoryExplorationRepository::new();
/// let id = store.next_id().await.expect("allocate");
/// assert_eq!(id.get(), 0);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryExplorationRepository {
    table: RwLock<ExplorationTable>,
}

impl InMemoryExplorationRepository {
    /// Create an empty store whose sequence starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ExplorationTable>, ExplorationRepositoryError> {
        self.table.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ExplorationTable>, ExplorationRepositoryError> {
        self.table.write().map_err(poisoned)
    }
}

#[async_trait]
impl ExplorationRepository for InMemoryExplorationRepository {
    async fn next_id(&self) -> Result<ExplorationId, ExplorationRepositoryError> {
        self.write()?.allocate()
    }

    async fn query(&self, owner: UserId) -> Result<Vec<Exploration>, ExplorationRepositoryError> {
        Ok(self.read()?.query(owner))
    }

    async fn get(&self, id: ExplorationId) -> Result<Exploration, ExplorationRepositoryError> {
        self.read()?.get(id)
    }

    async fn add(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError> {
        self.write()?.add(exploration.clone())
    }

    async fn update(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError> {
        self.write()?.update(exploration.clone())
    }

    async fn revise(
        &self,
        owner: UserId,
        id: ExplorationId,
        draft: ExplorationDraft,
        now: DateTime<Utc>,
    ) -> Result<Exploration, ExplorationRepositoryError> {
        self.write()?.revise(owner, id, draft, now)
    }

    async fn delete(&self, id: ExplorationId) -> Result<(), ExplorationRepositoryError> {
        self.write()?.delete(id)
    }
}

#[cfg(test)]
mod tests {
    //! Store contract checks against the in-memory adapter.
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn store() -> InMemoryExplorationRepository {
        InMemoryExplorationRepository::new()
    }

    fn record(id: ExplorationId, owner: u64, name: &str) -> Exploration {
        Exploration::create(
            id,
            UserId::new(owner),
            ExplorationDraft::new(name, "SELECT 1").expect("valid draft"),
            Utc::now(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn add_then_get_round_trips(store: InMemoryExplorationRepository) {
        let id = store.next_id().await.expect("allocate");
        let exploration = record(id, 42, "q1");
        store.add(&exploration).await.expect("add");

        assert_eq!(store.get(id).await.expect("get"), exploration);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_add_is_a_conflict(store: InMemoryExplorationRepository) {
        let exploration = record(ExplorationId::new(0), 42, "q1");
        store.add(&exploration).await.expect("first add");

        let err = store.add(&exploration).await.expect_err("second add");
        assert!(matches!(err, ExplorationRepositoryError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_records_are_not_found(store: InMemoryExplorationRepository) {
        let missing = ExplorationId::new(3);
        let exploration = record(missing, 42, "q1");

        assert!(matches!(
            store.get(missing).await,
            Err(ExplorationRepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            store.update(&exploration).await,
            Err(ExplorationRepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete(missing).await,
            Err(ExplorationRepositoryError::NotFound { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_queries_are_equal(store: InMemoryExplorationRepository) {
        for name in ["a", "b"] {
            let id = store.next_id().await.expect("allocate");
            store.add(&record(id, 42, name)).await.expect("add");
        }

        let first = store.query(UserId::new(42)).await.expect("query");
        let second = store.query(UserId::new(42)).await.expect("query");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_revisions_only_move_forward() {
        let store = Arc::new(InMemoryExplorationRepository::new());
        let id = store.next_id().await.expect("allocate");
        let created = record(id, 42, "q");
        store.add(&created).await.expect("add");

        // Every writer shares one stale clock reading.
        let now = created.updated_at();
        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let draft = ExplorationDraft::new(format!("q{n}"), "SELECT 1")
                        .expect("valid draft");
                    store
                        .revise(UserId::new(42), id, draft, now)
                        .await
                        .expect("revise")
                        .updated_at()
                })
            })
            .collect();

        let mut stamps = HashSet::new();
        for task in tasks {
            stamps.insert(task.await.expect("task"));
        }
        assert_eq!(stamps.len(), 16);
        let stored = store.get(id).await.expect("get");
        assert_eq!(stamps.iter().max(), Some(&stored.updated_at()));
        assert!(stamps.iter().all(|stamp| *stamp > created.updated_at()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_allocations_are_distinct() {
        let store = Arc::new(InMemoryExplorationRepository::new());
        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let id = store.next_id().await.expect("allocate");
                    store.add(&record(id, 42, "q")).await.expect("add");
                    id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for task in tasks {
            ids.insert(task.await.expect("task"));
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(store.query(UserId::new(42)).await.expect("query").len(), 32);
    }
}
