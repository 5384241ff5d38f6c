//! Driving port for exploration reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::links::{self, Link};
use crate::domain::{Error, Exploration, ExplorationId, SourceId, UserId};

/// Exploration representation returned to inbound adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationPayload {
    /// Store-wide identifier.
    pub id: ExplorationId,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: String,
    /// Opaque payload.
    pub data: String,
    /// Creation stamp.
    pub created_at: DateTime<Utc>,
    /// Last revision stamp.
    pub updated_at: DateTime<Utc>,
    /// Self link under the requested source.
    pub link: Link,
}

impl ExplorationPayload {
    /// Project an exploration, linking it under `source`.
    #[must_use]
    pub fn from_exploration(exploration: &Exploration, source: SourceId) -> Self {
        let href = links::exploration_path(source, exploration.owner(), exploration.id());
        Self {
            id: exploration.id(),
            owner: exploration.owner(),
            name: exploration.name().to_owned(),
            data: exploration.data().to_owned(),
            created_at: exploration.created_at(),
            updated_at: exploration.updated_at(),
            link: Link::self_link(href),
        }
    }
}

/// Request to list one owner's explorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListExplorationsRequest {
    /// Source the links are built under.
    pub source: SourceId,
    /// Owner whose records are listed.
    pub owner: UserId,
}

/// Request to fetch one exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetExplorationRequest {
    /// Source the link is built under.
    pub source: SourceId,
    /// Requesting owner.
    pub owner: UserId,
    /// Exploration to fetch.
    pub id: ExplorationId,
}

/// Use-case port for reading explorations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExplorationQuery: Send + Sync {
    /// List the owner's explorations in insertion order; empty when none.
    async fn list(
        &self,
        request: ListExplorationsRequest,
    ) -> Result<Vec<ExplorationPayload>, Error>;

    /// Fetch one exploration owned by the requesting owner.
    async fn get(&self, request: GetExplorationRequest) -> Result<ExplorationPayload, Error>;
}
