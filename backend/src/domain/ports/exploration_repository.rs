//! Driven port for exploration persistence.
//!
//! Adapters own the records and the identifier sequence. Every mutating call
//! must be atomic with respect to every other call on the same store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Exploration, ExplorationDraft, ExplorationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by exploration store adapters.
    pub enum ExplorationRepositoryError {
        /// No record carries the identifier.
        NotFound {
            /// Identifier that was looked up.
            id: ExplorationId,
        } => "exploration {id} not found",
        /// A record with the identifier already exists, or the write would
        /// reassign ownership.
        Conflict {
            /// Identifier of the contested record.
            id: ExplorationId,
        } => "exploration {id} conflicts with stored state",
        /// The storage medium failed.
        Storage {
            /// Adapter-specific failure description.
            message: String,
        } => "exploration store failed: {message}",
    }
}

/// Port for reading and writing explorations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExplorationRepository: Send + Sync {
    /// Allocate the next identifier from the store-wide sequence.
    ///
    /// Identifiers are never handed out twice, even after deletion.
    async fn next_id(&self) -> Result<ExplorationId, ExplorationRepositoryError>;

    /// All explorations owned by `owner`, in insertion order.
    async fn query(&self, owner: UserId) -> Result<Vec<Exploration>, ExplorationRepositoryError>;

    /// Fetch one exploration by identifier.
    async fn get(&self, id: ExplorationId) -> Result<Exploration, ExplorationRepositoryError>;

    /// Insert a new exploration; rejects identifiers already present.
    async fn add(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError>;

    /// Replace the exploration with the same identifier.
    async fn update(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError>;

    /// Apply `draft` to the stored record held by `owner` and return it.
    ///
    /// The read and the write happen under one lock, so `updatedAt` advances
    /// past whatever stamp is stored at that moment even when `now` was read
    /// before a concurrent revision landed. A record held by another owner is
    /// reported as [`ExplorationRepositoryError::NotFound`].
    async fn revise(
        &self,
        owner: UserId,
        id: ExplorationId,
        draft: ExplorationDraft,
        now: DateTime<Utc>,
    ) -> Result<Exploration, ExplorationRepositoryError>;

    /// Remove the exploration with the given identifier.
    async fn delete(&self, id: ExplorationId) -> Result<(), ExplorationRepositoryError>;
}
