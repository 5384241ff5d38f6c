//! Exploration aggregate.
//!
//! An exploration is a named, owned, timestamped query payload. The `data`
//! field is opaque: the domain stores and returns it verbatim.
//!
//! ## Invariants
//! - `owner` and `created_at` never change after construction.
//! - `created_at <= updated_at`, and every revision moves `updated_at`
//!   strictly forward.
//! - `name` is non-blank.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::{ExplorationId, UserId};

/// Validation errors raised while building exploration content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorationValidationError {
    /// The display name is empty once trimmed.
    EmptyName,
    /// A restored record claims it was updated before it was created.
    UpdatedBeforeCreated,
}

impl fmt::Display for ExplorationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "exploration name must not be empty"),
            Self::UpdatedBeforeCreated => {
                write!(f, "exploration updatedAt must not precede createdAt")
            }
        }
    }
}

impl std::error::Error for ExplorationValidationError {}

/// Caller-supplied exploration content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationDraft {
    name: String,
    data: String,
}

impl ExplorationDraft {
    /// Validate the name and build a draft.
    ///
    /// # Examples
    /// ```
    /// use chronograf::domain::ExplorationDraft;
    ///
    /// let draft = ExplorationDraft::new("q1", "SELECT 1").expect("valid draft");
    /// assert_eq!(draft.name(), "q1");
    /// assert!(ExplorationDraft::new("  ", "SELECT 1").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, ExplorationValidationError> {
        let text: String = name.into();
        if text.trim().is_empty() {
            return Err(ExplorationValidationError::EmptyName);
        }
        Ok(Self {
            name: text,
            data: data.into(),
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// A persisted exploration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exploration {
    id: ExplorationId,
    owner: UserId,
    name: String,
    data: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Exploration {
    /// Create a new exploration stamped at `now`.
    #[must_use]
    pub fn create(
        id: ExplorationId,
        owner: UserId,
        draft: ExplorationDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let ExplorationDraft { name, data } = draft;
        Self {
            id,
            owner,
            name,
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an exploration from stored fields, re-checking invariants.
    pub fn restore(
        id: ExplorationId,
        owner: UserId,
        draft: ExplorationDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ExplorationValidationError> {
        if updated_at < created_at {
            return Err(ExplorationValidationError::UpdatedBeforeCreated);
        }
        let mut exploration = Self::create(id, owner, draft, created_at);
        exploration.updated_at = updated_at;
        Ok(exploration)
    }

    /// Replace name and data, moving `updated_at` strictly forward.
    ///
    /// When `now` does not advance past the previous stamp (coarse or
    /// skewed clocks) the previous stamp plus one microsecond is used.
    pub fn revise(&mut self, draft: ExplorationDraft, now: DateTime<Utc>) {
        let ExplorationDraft { name, data } = draft;
        self.name = name;
        self.data = data;
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = now.max(floor);
    }

    /// Exploration identifier.
    #[must_use]
    pub const fn id(&self) -> ExplorationId {
        self.id
    }

    /// Owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp")
    }

    fn draft(name: &str) -> ExplorationDraft {
        ExplorationDraft::new(name, "SELECT mean(usage) FROM cpu").expect("valid draft")
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn draft_rejects_blank_names(#[case] name: &str) {
        assert_eq!(
            ExplorationDraft::new(name, "x"),
            Err(ExplorationValidationError::EmptyName)
        );
    }

    #[test]
    fn create_stamps_both_timestamps() {
        let exploration =
            Exploration::create(ExplorationId::new(3), UserId::new(9), draft("q"), at(10));
        assert_eq!(exploration.created_at(), exploration.updated_at());
    }

    #[test]
    fn revise_keeps_identity_and_advances_update_stamp() {
        let mut exploration =
            Exploration::create(ExplorationId::new(3), UserId::new(9), draft("q"), at(10));
        exploration.revise(draft("renamed"), at(20));

        assert_eq!(exploration.id(), ExplorationId::new(3));
        assert_eq!(exploration.owner(), UserId::new(9));
        assert_eq!(exploration.created_at(), at(10));
        assert_eq!(exploration.updated_at(), at(20));
        assert_eq!(exploration.name(), "renamed");
    }

    #[test]
    fn revise_moves_forward_when_clock_stalls() {
        let mut exploration =
            Exploration::create(ExplorationId::new(1), UserId::new(1), draft("q"), at(10));
        exploration.revise(draft("again"), at(10));
        assert!(exploration.updated_at() > at(10));

        let previous = exploration.updated_at();
        exploration.revise(draft("skewed"), at(5));
        assert!(exploration.updated_at() > previous);
    }

    #[test]
    fn restore_rejects_inverted_timestamps() {
        let result = Exploration::restore(
            ExplorationId::new(1),
            UserId::new(1),
            draft("q"),
            at(20),
            at(10),
        );
        assert_eq!(result, Err(ExplorationValidationError::UpdatedBeforeCreated));
    }
}
