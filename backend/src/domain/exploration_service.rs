//! Exploration lifecycle service.
//!
//! Implements the exploration driving ports on top of an
//! [`ExplorationRepository`]. The service owns the identifier and timestamp
//! policy:
//!
//! - identifiers come from the store's sequence, so concurrent creates for
//!   one owner never share an id and deleted ids are never reused;
//! - `createdAt` and `updatedAt` are stamped from the injected clock, and
//!   every update moves `updatedAt` strictly forward;
//! - an exploration owned by another user is reported as missing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{
    CreateExplorationRequest, DeleteExplorationRequest, ExplorationCommand, ExplorationPayload,
    ExplorationQuery, ExplorationRepository, ExplorationRepositoryError, GetExplorationRequest,
    ListExplorationsRequest, UpdateExplorationRequest,
};
use crate::domain::{Error, Exploration, ExplorationId, UserId};

fn map_repository_error(error: ExplorationRepositoryError) -> Error {
    match error {
        ExplorationRepositoryError::NotFound { id } => {
            Error::not_found(format!("exploration {id} not found"))
        }
        ExplorationRepositoryError::Conflict { id } => {
            Error::conflict(format!("exploration {id} conflicts with stored state"))
        }
        ExplorationRepositoryError::Storage { message } => {
            error!(%message, "exploration store failed");
            Error::internal(format!("exploration store error: {message}"))
        }
    }
}

/// Exploration service implementing the command and query driving ports.
#[derive(Clone)]
pub struct ExplorationService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ExplorationService<R> {
    /// Create a service over `repository`, stamping times from `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chronograf::domain::ExplorationService;
    /// use chronograf::outbound::persistence::InMemoryExplorationRepository;
    /// use mockable::DefaultClock;
    ///
    /// let service = ExplorationService::new(
    ///     Arc::new(InMemoryExplorationRepository::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ExplorationService<R>
where
    R: ExplorationRepository,
{
    /// Fetch an exploration and confirm `owner` holds it.
    async fn owned(&self, owner: UserId, id: ExplorationId) -> Result<Exploration, Error> {
        let exploration = self
            .repository
            .get(id)
            .await
            .map_err(map_repository_error)?;
        if exploration.owner() != owner {
            debug!(%owner, %id, "exploration belongs to another owner");
            return Err(Error::not_found(format!("exploration {id} not found")));
        }
        Ok(exploration)
    }
}

#[async_trait]
impl<R> ExplorationQuery for ExplorationService<R>
where
    R: ExplorationRepository,
{
    async fn list(
        &self,
        request: ListExplorationsRequest,
    ) -> Result<Vec<ExplorationPayload>, Error> {
        let explorations = self
            .repository
            .query(request.owner)
            .await
            .map_err(map_repository_error)?;

        Ok(explorations
            .iter()
            .map(|exploration| ExplorationPayload::from_exploration(exploration, request.source))
            .collect())
    }

    async fn get(&self, request: GetExplorationRequest) -> Result<ExplorationPayload, Error> {
        let exploration = self.owned(request.owner, request.id).await?;
        Ok(ExplorationPayload::from_exploration(
            &exploration,
            request.source,
        ))
    }
}

#[async_trait]
impl<R> ExplorationCommand for ExplorationService<R>
where
    R: ExplorationRepository,
{
    async fn create(&self, request: CreateExplorationRequest) -> Result<ExplorationPayload, Error> {
        let CreateExplorationRequest {
            source,
            owner,
            draft,
        } = request;

        let id = self
            .repository
            .next_id()
            .await
            .map_err(map_repository_error)?;
        let exploration = Exploration::create(id, owner, draft, self.clock.utc());
        self.repository
            .add(&exploration)
            .await
            .map_err(map_repository_error)?;

        info!(%owner, %id, "exploration created");
        Ok(ExplorationPayload::from_exploration(&exploration, source))
    }

    async fn update(&self, request: UpdateExplorationRequest) -> Result<(), Error> {
        let UpdateExplorationRequest {
            owner,
            id,
            draft: body,
        } = request;

        let Some(draft) = body else {
            self.owned(owner, id).await?;
            debug!(%owner, %id, "update without body left exploration unchanged");
            return Ok(());
        };

        let revised = self
            .repository
            .revise(owner, id, draft, self.clock.utc())
            .await
            .map_err(map_repository_error)?;

        info!(%owner, %id, updated_at = %revised.updated_at(), "exploration updated");
        Ok(())
    }

    async fn delete(&self, request: DeleteExplorationRequest) -> Result<(), Error> {
        let DeleteExplorationRequest { owner, id } = request;
        self.owned(owner, id).await?;
        self.repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;

        info!(%owner, %id, "exploration deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "exploration_service_tests.rs"]
mod tests;
