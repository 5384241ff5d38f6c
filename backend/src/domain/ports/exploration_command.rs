//! Driving port for exploration mutations.
//!
//! Inbound adapters call this port with already-parsed identifiers and
//! validated drafts; the service assigns identifiers and timestamps.

use async_trait::async_trait;

use crate::domain::{Error, ExplorationDraft, ExplorationId, SourceId, UserId};

use super::ExplorationPayload;

/// Request to create an exploration for an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateExplorationRequest {
    /// Source the exploration is linked under.
    pub source: SourceId,
    /// Owning user.
    pub owner: UserId,
    /// Validated content.
    pub draft: ExplorationDraft,
}

/// Request to replace an exploration's content.
///
/// A missing draft is a tolerated no-op once the exploration is known to
/// exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateExplorationRequest {
    /// Requesting owner.
    pub owner: UserId,
    /// Exploration to revise.
    pub id: ExplorationId,
    /// Replacement content; `None` for an empty body.
    pub draft: Option<ExplorationDraft>,
}

/// Request to delete an exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteExplorationRequest {
    /// Requesting owner.
    pub owner: UserId,
    /// Exploration to remove.
    pub id: ExplorationId,
}

/// Use-case port for creating, updating and deleting explorations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExplorationCommand: Send + Sync {
    /// Create an exploration and return its stored representation.
    async fn create(&self, request: CreateExplorationRequest) -> Result<ExplorationPayload, Error>;

    /// Replace name and data of an existing exploration.
    async fn update(&self, request: UpdateExplorationRequest) -> Result<(), Error>;

    /// Delete an existing exploration.
    async fn delete(&self, request: DeleteExplorationRequest) -> Result<(), Error>;
}
