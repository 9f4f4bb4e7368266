//! Process-wide map of owner → running job.
//!
//! A key exists exactly while its owner has a job that has not finished
//! cleanup. All access goes through `DashMap`'s shard locks, so:
//! - check-and-insert in [`JobRegistry::try_register`] is atomic,
//! - a cancel and the job's own removal never interleave halfway,
//! - removal is keyed on the job id, so a finished job cannot remove the
//!   entry of a newer job for the same owner.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{JobError, JobStatus, OwnerId};

/// What the registry keeps for each running job
#[derive(Debug, Clone)]
pub struct ActiveJob {
    pub job_id: Uuid,
    pub cancel: CancellationToken,
    pub status: watch::Receiver<JobStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    entries: Arc<DashMap<OwnerId, ActiveJob>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `job` for `owner` unless the owner already has one.
    ///
    /// # Errors
    /// [`JobError::Conflict`] when an entry for `owner` exists.
    pub fn try_register(&self, owner: OwnerId, job: ActiveJob) -> Result<(), JobError> {
        match self.entries.entry(owner) {
            Entry::Occupied(_) => Err(JobError::Conflict(owner)),
            Entry::Vacant(slot) => {
                slot.insert(job);
                Ok(())
            }
        }
    }

    /// Raises the cancel signal of `owner`'s job.
    ///
    /// Returns false when there is no running job; nothing is changed then.
    pub fn cancel(&self, owner: OwnerId) -> bool {
        match self.entries.get(&owner) {
            Some(entry) if !entry.status.borrow().is_terminal() => {
                entry.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Removes `owner`'s entry if it still belongs to `job_id`.
    pub fn remove(&self, owner: OwnerId, job_id: Uuid) -> bool {
        self.entries.remove_if(&owner, |_, entry| entry.job_id == job_id).is_some()
    }

    pub fn contains(&self, owner: OwnerId) -> bool {
        self.entries.contains_key(&owner)
    }

    /// Current status of `owner`'s job
    pub fn status(&self, owner: OwnerId) -> Option<JobStatus> {
        self.entries.get(&owner).map(|entry| *entry.status.borrow())
    }

    pub fn job_id(&self, owner: OwnerId) -> Option<Uuid> {
        self.entries.get(&owner).map(|entry| entry.job_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
