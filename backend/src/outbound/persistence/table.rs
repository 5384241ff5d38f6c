//! Lock-free exploration layout shared by the store adapters.
//!
//! Records are grouped per owner in insertion order, with an id index and
//! the identifier sequence alongside. Callers provide the locking.

use std::collections::HashMap;

use crate::domain::ports::ExplorationRepositoryError;
use chrono::{DateTime, Utc};

use crate::domain::{Exploration, ExplorationDraft, ExplorationId, UserId};

#[derive(Debug, Clone, Default)]
pub(super) struct ExplorationTable {
    by_owner: HashMap<UserId, Vec<Exploration>>,
    owners: HashMap<ExplorationId, UserId>,
    next_id: u64,
}

impl ExplorationTable {
    /// Rebuild a table from records listed in insertion order.
    ///
    /// The sequence resumes after both `next_id` and the largest stored id.
    pub(super) fn from_records(
        next_id: u64,
        records: Vec<Exploration>,
    ) -> Result<Self, ExplorationRepositoryError> {
        let mut table = Self {
            next_id,
            ..Self::default()
        };
        for record in records {
            table.add(record)?;
        }
        Ok(table)
    }

    pub(super) const fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(super) fn allocate(&mut self) -> Result<ExplorationId, ExplorationRepositoryError> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| ExplorationRepositoryError::storage("identifier sequence exhausted"))?;
        Ok(ExplorationId::new(id))
    }

    pub(super) fn query(&self, owner: UserId) -> Vec<Exploration> {
        self.by_owner.get(&owner).cloned().unwrap_or_default()
    }

    pub(super) fn get(&self, id: ExplorationId) -> Result<Exploration, ExplorationRepositoryError> {
        self.slot(id)
            .and_then(|(owner, index)| self.by_owner.get(&owner)?.get(index))
            .cloned()
            .ok_or_else(|| ExplorationRepositoryError::not_found(id))
    }

    pub(super) fn add(&mut self, exploration: Exploration) -> Result<(), ExplorationRepositoryError> {
        let id = exploration.id();
        if self.owners.contains_key(&id) {
            return Err(ExplorationRepositoryError::conflict(id));
        }
        // Ids assigned outside the sequence must not be handed out again.
        self.next_id = self.next_id.max(id.get().saturating_add(1));
        self.owners.insert(id, exploration.owner());
        self.by_owner
            .entry(exploration.owner())
            .or_default()
            .push(exploration);
        Ok(())
    }

    pub(super) fn update(
        &mut self,
        exploration: Exploration,
    ) -> Result<(), ExplorationRepositoryError> {
        let id = exploration.id();
        let (owner, index) = self
            .slot(id)
            .ok_or_else(|| ExplorationRepositoryError::not_found(id))?;
        if owner != exploration.owner() {
            return Err(ExplorationRepositoryError::conflict(id));
        }
        let slot = self
            .by_owner
            .get_mut(&owner)
            .and_then(|records| records.get_mut(index))
            .ok_or_else(|| ExplorationRepositoryError::not_found(id))?;
        *slot = exploration;
        Ok(())
    }

    pub(super) fn revise(
        &mut self,
        owner: UserId,
        id: ExplorationId,
        draft: ExplorationDraft,
        now: DateTime<Utc>,
    ) -> Result<Exploration, ExplorationRepositoryError> {
        let (holder, index) = self
            .slot(id)
            .filter(|(holder, _)| *holder == owner)
            .ok_or_else(|| ExplorationRepositoryError::not_found(id))?;
        let record = self
            .by_owner
            .get_mut(&holder)
            .and_then(|records| records.get_mut(index))
            .ok_or_else(|| ExplorationRepositoryError::not_found(id))?;
        record.revise(draft, now);
        Ok(record.clone())
    }

    pub(super) fn delete(&mut self, id: ExplorationId) -> Result<(), ExplorationRepositoryError> {
        let (owner, index) = self
            .slot(id)
            .ok_or_else(|| ExplorationRepositoryError::not_found(id))?;
        self.owners.remove(&id);
        if let Some(records) = self.by_owner.get_mut(&owner) {
            records.remove(index);
            if records.is_empty() {
                self.by_owner.remove(&owner);
            }
        }
        Ok(())
    }

    /// Every record, owners in id order of their first record, each owner's
    /// records in insertion order.
    pub(super) fn records(&self) -> Vec<&Exploration> {
        let mut groups: Vec<&Vec<Exploration>> = self.by_owner.values().collect();
        groups.sort_by_key(|records| records.first().map(Exploration::id));
        groups.into_iter().flatten().collect()
    }

    fn slot(&self, id: ExplorationId) -> Option<(UserId, usize)> {
        let owner = *self.owners.get(&id)?;
        let index = self
            .by_owner
            .get(&owner)?
            .iter()
            .position(|record| record.id() == id)?;
        Some((owner, index))
    }
}
