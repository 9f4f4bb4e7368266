//! Compression jobs: one in-flight download → encode → upload per user.
//!
//! - [`JobRegistry`] maps an owner to their running job
//! - [`Coordinator`] starts, runs, cancels, and cleans up jobs
//! - [`ProgressSink`] is how a job tells the chat what it is doing

pub mod coordinator;
pub mod job;
pub mod registry;

pub use coordinator::{Coordinator, JobHandle};
pub use job::{Job, JobReport, JobRequest, JobStatus};
pub use registry::JobRegistry;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::conversion::EncodeError;
use crate::transfer::TransferError;

/// Identity of the user a job belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OwnerId {
    fn from(id: i64) -> Self {
        OwnerId(id)
    }
}

/// Why a job did not complete (or could not start)
#[derive(Error, Debug)]
pub enum JobError {
    /// Owner already has an active job
    #[error("Owner {0} already has an active job")]
    Conflict(OwnerId),

    #[error("Unknown quality selector: {0:?}")]
    InvalidQuality(String),

    #[error("Transfer failed: {0}")]
    Transfer(TransferError),

    #[error("Encoding failed: {0}")]
    Encode(EncodeError),

    /// Not a failure: the owner asked to stop
    #[error("Job cancelled")]
    Cancelled,
}

impl From<TransferError> for JobError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Cancelled => JobError::Cancelled,
            other => JobError::Transfer(other),
        }
    }
}

impl From<EncodeError> for JobError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Cancelled => JobError::Cancelled,
            EncodeError::InvalidQuality(selector) => JobError::InvalidQuality(selector),
            other => JobError::Encode(other),
        }
    }
}

impl JobError {
    /// Short reason safe to show in chat; the full error goes to the log.
    pub fn user_summary(&self) -> &'static str {
        match self {
            JobError::Conflict(_) => "another compression is already running",
            JobError::InvalidQuality(_) => "unknown quality",
            JobError::Transfer(_) => "could not transfer the file",
            JobError::Encode(EncodeError::TimedOut(_)) => "compression took too long",
            JobError::Encode(_) => "the encoder failed",
            JobError::Cancelled => "cancelled",
        }
    }
}

/// One status transition, as reported to a [`ProgressSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub owner_id: OwnerId,
    pub job_id: Uuid,
    pub status: JobStatus,
    /// Quality label while transcoding, short failure reason when failed
    pub detail: Option<String>,
}

/// Observer of job progress (in production: the chat status message).
///
/// Errors are logged by the coordinator and never affect the job.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, update: &ProgressUpdate) -> anyhow::Result<()>;
}

/// Sink that drops every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressSink for NoopProgress {
    async fn report(&self, _update: &ProgressUpdate) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cancellation_errors_collapse_to_cancelled() {
        assert!(matches!(JobError::from(TransferError::Cancelled), JobError::Cancelled));
        assert!(matches!(JobError::from(EncodeError::Cancelled), JobError::Cancelled));
    }

    #[test]
    fn test_invalid_quality_is_preserved() {
        let err = JobError::from(EncodeError::InvalidQuality("4k".to_string()));
        assert!(matches!(err, JobError::InvalidQuality(ref s) if s == "4k"));
    }

    #[test]
    fn test_user_summary_hides_raw_detail() {
        let err = JobError::from(EncodeError::Failed {
            exit_code: Some(1),
            stderr_excerpt: "/secret/path/in.mp4: Invalid data".to_string(),
        });
        assert_eq!(err.user_summary(), "the encoder failed");
        assert!(err.to_string().contains("Invalid data"));

        let err = JobError::from(EncodeError::TimedOut(Duration::from_secs(5)));
        assert_eq!(err.user_summary(), "compression took too long");

        let err = JobError::from(TransferError::platform("file is too big"));
        assert_eq!(err.user_summary(), "could not transfer the file");
    }

    #[test]
    fn test_owner_id_display() {
        assert_eq!(OwnerId(42).to_string(), "42");
        assert_eq!(OwnerId::from(-7), OwnerId(-7));
    }
}
