//! Driven port resolving configured sources.

use crate::domain::{Source, SourceId};

/// Read-only lookup over configured sources.
#[cfg_attr(test, mockall::automock)]
pub trait SourceCatalogue: Send + Sync {
    /// Every configured source, ordered by identifier.
    fn list(&self) -> Vec<Source>;

    /// The source with `id`, if configured.
    fn find(&self, id: SourceId) -> Option<Source>;
}
