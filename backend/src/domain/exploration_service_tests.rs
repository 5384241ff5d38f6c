//! Tests for the exploration service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};
use tokio::sync::Notify;

use super::*;
use crate::domain::ports::MockExplorationRepository;
use crate::domain::{ErrorCode, ExplorationDraft, SourceId};
use crate::outbound::persistence::InMemoryExplorationRepository;

const SOURCE: SourceId = SourceId::new(1);
const OWNER: UserId = UserId::new(42);

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .expect("valid timestamp")
}

fn clock_at(seconds: i64) -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(at(seconds));
    Arc::new(clock)
}

fn draft(name: &str, data: &str) -> ExplorationDraft {
    ExplorationDraft::new(name, data).expect("valid draft")
}

#[fixture]
fn stored() -> Exploration {
    Exploration::create(
        ExplorationId::new(3),
        OWNER,
        draft("cpu", "SELECT mean(usage_idle) FROM cpu"),
        at(100),
    )
}

type TestService = ExplorationService<MockExplorationRepository>;

fn service(repo: MockExplorationRepository, now: i64) -> TestService {
    ExplorationService::new(Arc::new(repo), clock_at(now))
}

#[tokio::test]
async fn create_uses_allocated_id_and_stamps_both_timestamps() {
    let mut repo = MockExplorationRepository::new();
    repo.expect_next_id()
        .times(1)
        .return_once(|| Ok(ExplorationId::new(0)));
    repo.expect_add()
        .withf(|exploration| {
            exploration.id() == ExplorationId::new(0) && exploration.owner() == OWNER
        })
        .times(1)
        .return_once(|_| Ok(()));

    let created = service(repo, 500)
        .create(CreateExplorationRequest {
            source: SOURCE,
            owner: OWNER,
            draft: draft("q1", "SELECT 1"),
        })
        .await
        .expect("create succeeds");

    assert_eq!(created.id, ExplorationId::new(0));
    assert_eq!(created.created_at, at(500));
    assert_eq!(created.updated_at, at(500));
    assert_eq!(
        created.link.href,
        "/chronograf/v1/sources/1/users/42/explorations/0"
    );
    assert_eq!(created.link.rel, "self");
}

#[tokio::test]
async fn create_maps_id_collision_to_conflict() {
    let mut repo = MockExplorationRepository::new();
    repo.expect_next_id()
        .return_once(|| Ok(ExplorationId::new(7)));
    repo.expect_add()
        .return_once(|_| Err(ExplorationRepositoryError::conflict(ExplorationId::new(7))));

    let error = service(repo, 1)
        .create(CreateExplorationRequest {
            source: SOURCE,
            owner: OWNER,
            draft: draft("q1", "SELECT 1"),
        })
        .await
        .expect_err("collision surfaces");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_revises_content_and_preserves_identity(stored: Exploration) {
    let mut repo = MockExplorationRepository::new();
    repo.expect_get().times(0);
    repo.expect_revise()
        .withf(|owner, id, draft, now| {
            *owner == OWNER
                && *id == ExplorationId::new(3)
                && draft.name() == "mem"
                && draft.data() == "SELECT used FROM mem"
                && *now == at(200)
        })
        .times(1)
        .return_once(move |_, _, draft, now| {
            let mut revised = stored;
            revised.revise(draft, now);
            Ok(revised)
        });

    service(repo, 200)
        .update(UpdateExplorationRequest {
            owner: OWNER,
            id: ExplorationId::new(3),
            draft: Some(draft("mem", "SELECT used FROM mem")),
        })
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_without_body_is_a_no_op(stored: Exploration) {
    let mut repo = MockExplorationRepository::new();
    repo.expect_get().return_once(move |_| Ok(stored));
    repo.expect_revise().times(0);
    repo.expect_update().times(0);

    service(repo, 200)
        .update(UpdateExplorationRequest {
            owner: OWNER,
            id: ExplorationId::new(3),
            draft: None,
        })
        .await
        .expect("no-op update succeeds");
}

#[rstest]
#[case::with_body(Some(draft("mem", "SELECT 1")))]
#[case::without_body(None)]
#[tokio::test]
async fn update_of_foreign_exploration_is_not_found(
    stored: Exploration,
    #[case] body: Option<ExplorationDraft>,
) {
    let mut repo = MockExplorationRepository::new();
    repo.expect_get().return_once(move |_| Ok(stored));
    repo.expect_revise()
        .return_once(|_, id, _, _| Err(ExplorationRepositoryError::not_found(id)));

    let error = service(repo, 200)
        .update(UpdateExplorationRequest {
            owner: UserId::new(7),
            id: ExplorationId::new(3),
            draft: body,
        })
        .await
        .expect_err("other owner cannot update");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

/// Store wrapper that holds back the revision named `held` until released.
struct HeldRevision {
    inner: InMemoryExplorationRepository,
    held: &'static str,
    release: Notify,
}

#[async_trait]
impl ExplorationRepository for HeldRevision {
    async fn next_id(&self) -> Result<ExplorationId, ExplorationRepositoryError> {
        self.inner.next_id().await
    }

    async fn query(&self, owner: UserId) -> Result<Vec<Exploration>, ExplorationRepositoryError> {
        self.inner.query(owner).await
    }

    async fn get(&self, id: ExplorationId) -> Result<Exploration, ExplorationRepositoryError> {
        self.inner.get(id).await
    }

    async fn add(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError> {
        self.inner.add(exploration).await
    }

    async fn update(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError> {
        self.inner.update(exploration).await
    }

    async fn revise(
        &self,
        owner: UserId,
        id: ExplorationId,
        draft: ExplorationDraft,
        now: DateTime<Utc>,
    ) -> Result<Exploration, ExplorationRepositoryError> {
        if draft.name() == self.held {
            self.release.notified().await;
        }
        self.inner.revise(owner, id, draft, now).await
    }

    async fn delete(&self, id: ExplorationId) -> Result<(), ExplorationRepositoryError> {
        self.inner.delete(id).await
    }
}

#[rstest]
#[tokio::test]
async fn interleaved_updates_never_move_updated_at_backwards(stored: Exploration) {
    let inner = InMemoryExplorationRepository::new();
    inner.add(&stored).await.expect("seed");
    let repo = Arc::new(HeldRevision {
        inner,
        held: "slow",
        release: Notify::new(),
    });
    let slow = ExplorationService::new(Arc::clone(&repo), clock_at(110));
    let fast = ExplorationService::new(Arc::clone(&repo), clock_at(120));
    let request = |name: &str| UpdateExplorationRequest {
        owner: OWNER,
        id: stored.id(),
        draft: Some(draft(name, "SELECT 1")),
    };

    // The slow writer reads its clock first and commits after the fast one.
    let (slow_result, fast_result) = tokio::join!(slow.update(request("slow")), async {
        let result = fast.update(request("fast")).await;
        repo.release.notify_one();
        result
    });
    slow_result.expect("slow update");
    fast_result.expect("fast update");

    let current = repo.get(stored.id()).await.expect("get");
    assert_eq!(current.name(), "slow");
    assert!(current.updated_at() > at(120));
}

#[rstest]
#[tokio::test]
async fn foreign_explorations_are_reported_missing(stored: Exploration) {
    let mut repo = MockExplorationRepository::new();
    repo.expect_get().return_once(move |_| Ok(stored));
    repo.expect_delete().times(0);

    let error = service(repo, 1)
        .delete(DeleteExplorationRequest {
            owner: UserId::new(7),
            id: ExplorationId::new(3),
        })
        .await
        .expect_err("other owner cannot delete");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn get_maps_missing_record_to_not_found() {
    let mut repo = MockExplorationRepository::new();
    repo.expect_get()
        .return_once(|id| Err(ExplorationRepositoryError::not_found(id)));

    let error = service(repo, 1)
        .get(GetExplorationRequest {
            source: SOURCE,
            owner: OWNER,
            id: ExplorationId::new(9),
        })
        .await
        .expect_err("missing exploration");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "exploration 9 not found");
}

#[tokio::test]
async fn list_maps_storage_failure_to_internal_error() {
    let mut repo = MockExplorationRepository::new();
    repo.expect_query()
        .return_once(|_| Err(ExplorationRepositoryError::storage("disk full")));

    let error = service(repo, 1)
        .list(ListExplorationsRequest {
            source: SOURCE,
            owner: OWNER,
        })
        .await
        .expect_err("storage failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn list_links_every_record_to_its_owner(stored: Exploration) {
    let mut repo = MockExplorationRepository::new();
    repo.expect_query().return_once(move |_| Ok(vec![stored]));

    let listed = service(repo, 1)
        .list(ListExplorationsRequest {
            source: SOURCE,
            owner: OWNER,
        })
        .await
        .expect("list succeeds");

    let hrefs: Vec<_> = listed.iter().map(|item| item.link.href.as_str()).collect();
    assert_eq!(hrefs, ["/chronograf/v1/sources/1/users/42/explorations/3"]);
}
