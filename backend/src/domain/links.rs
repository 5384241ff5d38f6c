//! Canonical resource paths embedded in representations.

use super::{ExplorationId, SourceId, UserId};

/// Root under which every API path is mounted.
pub const API_ROOT: &str = "/chronograf/v1";

/// Relation name for a resource's own retrieval path.
pub const SELF_REL: &str = "self";

/// A typed hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Relation of the target to the containing resource.
    pub rel: String,
    /// Absolute path of the target.
    pub href: String,
}

impl Link {
    /// Build a `rel="self"` link.
    #[must_use]
    pub fn self_link(href: String) -> Self {
        Self {
            rel: SELF_REL.to_owned(),
            href,
        }
    }
}

/// Path of a single source.
#[must_use]
pub fn source_path(source: SourceId) -> String {
    format!("{API_ROOT}/sources/{source}")
}

/// Path of an owner's exploration collection.
#[must_use]
pub fn explorations_path(source: SourceId, owner: UserId) -> String {
    format!("{}/users/{owner}/explorations", source_path(source))
}

/// Path of one exploration.
///
/// # Examples
/// ```
/// use chronograf::domain::{ExplorationId, SourceId, UserId, links};
///
/// let href = links::exploration_path(SourceId::new(1), UserId::new(42), ExplorationId::new(0));
/// assert_eq!(href, "/chronograf/v1/sources/1/users/42/explorations/0");
/// ```
#[must_use]
pub fn exploration_path(source: SourceId, owner: UserId, id: ExplorationId) -> String {
    format!("{}/{id}", explorations_path(source, owner))
}
