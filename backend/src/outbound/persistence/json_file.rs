//! JSON-file exploration store.
//!
//! Keeps the in-memory layout and rewrites a JSON snapshot after every
//! successful mutation. Snapshots are written to a staging file in the same
//! directory and renamed over the target, so readers never see a partial
//! file. A mutation whose snapshot cannot be written is rolled back.
//!
//! Snapshot writes use blocking `cap_std` calls on the calling task while
//! the table's write lock is held. Readers queue behind a write for as long
//! as the disk takes, and the executor thread is occupied for that time.
//! Snapshots are small and written once per mutation, so this store suits
//! single-node deployments with modest write rates.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::table::ExplorationTable;
use crate::domain::ports::{ExplorationRepository, ExplorationRepositoryError};
use crate::domain::{
    Exploration, ExplorationDraft, ExplorationId, ExplorationValidationError, UserId,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDto {
    next_id: u64,
    explorations: Vec<ExplorationRecordDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplorationRecordDto {
    id: u64,
    owner: u64,
    name: String,
    data: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Exploration> for ExplorationRecordDto {
    fn from(value: &Exploration) -> Self {
        Self {
            id: value.id().get(),
            owner: value.owner().get(),
            name: value.name().to_owned(),
            data: value.data().to_owned(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

impl ExplorationRecordDto {
    fn into_domain(self) -> Result<Exploration, ExplorationRepositoryError> {
        let Self {
            id,
            owner,
            name,
            data,
            created_at,
            updated_at,
        } = self;
        let corrupt = |err: ExplorationValidationError| {
            ExplorationRepositoryError::storage(format!("stored exploration {id}: {err}"))
        };
        let draft = ExplorationDraft::new(name, data).map_err(corrupt)?;
        Exploration::restore(
            ExplorationId::new(id),
            UserId::new(owner),
            draft,
            created_at,
            updated_at,
        )
        .map_err(corrupt)
    }
}

fn io_error(path: &Path, error: &io::Error) -> ExplorationRepositoryError {
    ExplorationRepositoryError::storage(format!("{}: {error}", path.display()))
}

/// Exploration store persisted to a single JSON file.
pub struct JsonFileExplorationRepository {
    dir: Dir,
    path: PathBuf,
    file_name: OsString,
    table: RwLock<ExplorationTable>,
}

impl JsonFileExplorationRepository {
    /// Open the store at `location`, creating parent directories as needed.
    ///
    /// An absent file yields an empty store. The identifier sequence resumes
    /// after the largest identifier ever allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorationRepositoryError::Storage`] when the directory
    /// cannot be opened or the snapshot cannot be read or decoded.
    pub fn open(location: impl AsRef<Path>) -> Result<Self, ExplorationRepositoryError> {
        let path = location.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                ExplorationRepositoryError::storage(format!(
                    "{}: store path must name a file",
                    path.display()
                ))
            })?
            .to_os_string();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Dir::create_ambient_dir_all(&parent, ambient_authority())
            .map_err(|error| io_error(&parent, &error))?;
        let dir = Dir::open_ambient_dir(&parent, ambient_authority())
            .map_err(|error| io_error(&parent, &error))?;

        let table = match dir.read(&file_name) {
            Ok(bytes) => {
                let snapshot: SnapshotDto = serde_json::from_slice(&bytes).map_err(|error| {
                    ExplorationRepositoryError::storage(format!("{}: {error}", path.display()))
                })?;
                let records = snapshot
                    .explorations
                    .into_iter()
                    .map(ExplorationRecordDto::into_domain)
                    .collect::<Result<Vec<_>, _>>()?;
                ExplorationTable::from_records(snapshot.next_id, records)?
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => ExplorationTable::default(),
            Err(error) => return Err(io_error(&path, &error)),
        };

        info!(
            path = %path.display(),
            next_id = table.next_id(),
            "exploration store opened"
        );
        Ok(Self {
            dir,
            path,
            file_name,
            table: RwLock::new(table),
        })
    }

    fn persist(&self, table: &ExplorationTable) -> Result<(), ExplorationRepositoryError> {
        let snapshot = SnapshotDto {
            next_id: table.next_id(),
            explorations: table
                .records()
                .into_iter()
                .map(ExplorationRecordDto::from)
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|error| ExplorationRepositoryError::storage(error.to_string()))?;

        let mut staging = OsString::from(".");
        staging.push(&self.file_name);
        staging.push(format!(".{}.tmp", Uuid::new_v4().simple()));

        let written = self
            .dir
            .write(&staging, &bytes)
            .and_then(|()| self.dir.rename(&staging, &self.dir, &self.file_name));
        if let Err(error) = written {
            let _cleanup_result = self.dir.remove_file(&staging);
            return Err(io_error(&self.path, &error));
        }
        debug!(path = %self.path.display(), bytes = bytes.len(), "exploration snapshot written");
        Ok(())
    }

    /// Apply `change` to a copy of the table and keep it only once the
    /// snapshot is on disk.
    async fn mutate<T: Send>(
        &self,
        change: impl FnOnce(&mut ExplorationTable) -> Result<T, ExplorationRepositoryError> + Send,
    ) -> Result<T, ExplorationRepositoryError> {
        let mut table = self.table.write().await;
        let mut staged = table.clone();
        let value = change(&mut staged)?;
        self.persist(&staged)?;
        *table = staged;
        Ok(value)
    }
}

#[async_trait]
impl ExplorationRepository for JsonFileExplorationRepository {
    async fn next_id(&self) -> Result<ExplorationId, ExplorationRepositoryError> {
        // The sequence reaches disk with the next add.
        self.table.write().await.allocate()
    }

    async fn query(&self, owner: UserId) -> Result<Vec<Exploration>, ExplorationRepositoryError> {
        Ok(self.table.read().await.query(owner))
    }

    async fn get(&self, id: ExplorationId) -> Result<Exploration, ExplorationRepositoryError> {
        self.table.read().await.get(id)
    }

    async fn add(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError> {
        let record = exploration.clone();
        self.mutate(move |table| table.add(record)).await
    }

    async fn update(&self, exploration: &Exploration) -> Result<(), ExplorationRepositoryError> {
        let record = exploration.clone();
        self.mutate(move |table| table.update(record)).await
    }

    async fn revise(
        &self,
        owner: UserId,
        id: ExplorationId,
        draft: ExplorationDraft,
        now: DateTime<Utc>,
    ) -> Result<Exploration, ExplorationRepositoryError> {
        self.mutate(move |table| table.revise(owner, id, draft, now))
            .await
    }

    async fn delete(&self, id: ExplorationId) -> Result<(), ExplorationRepositoryError> {
        self.mutate(move |table| table.delete(id)).await
    }
}
