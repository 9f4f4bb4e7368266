//! Job data and its status machine

use std::path::PathBuf;
use strum::{Display, IntoStaticStr};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::OwnerId;

/// File name used when the upload carried none
pub const DEFAULT_DISPLAY_NAME: &str = "video.mp4";

/// Where a job is in its lifecycle.
///
/// Forward order: `Pending → Downloading → Transcoding → Uploading →
/// Completed`. `Cancelled` and `Failed` can interrupt any non-terminal
/// state. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Downloading,
    Transcoding,
    Uploading,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Position in the forward pipeline; `None` for interruptions
    fn pipeline_position(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Downloading => Some(1),
            Self::Transcoding => Some(2),
            Self::Uploading => Some(3),
            Self::Completed => Some(4),
            Self::Cancelled | Self::Failed => None,
        }
    }

    /// Whether `self → next` is a legal transition
    #[must_use]
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.pipeline_position(), next.pipeline_position()) {
            (Some(current), Some(target)) => target == current + 1,
            // Cancelled / Failed from any live state
            (Some(_), None) => true,
            _ => false,
        }
    }
}

/// What the chat layer hands to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub owner_id: OwnerId,
    /// Chat the result is delivered to
    pub destination: i64,
    /// Platform download token (Telegram `file_id`)
    pub source_reference: String,
    /// Original file name, used only for delivery
    pub display_name: String,
    /// Raw quality choice, validated when the job runs
    pub quality_selector: String,
}

impl JobRequest {
    /// Request delivering into the owner's private chat.
    pub fn new(
        owner_id: OwnerId,
        source_reference: impl Into<String>,
        display_name: Option<String>,
        quality_selector: impl Into<String>,
    ) -> Self {
        Self {
            owner_id,
            destination: owner_id.0,
            source_reference: source_reference.into(),
            display_name: display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            quality_selector: quality_selector.into(),
        }
    }

    pub fn with_destination(mut self, chat_id: i64) -> Self {
        self.destination = chat_id;
        self
    }
}

/// Live state of one job, owned by the task running it
#[derive(Debug)]
pub struct Job {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub destination: i64,
    pub source_reference: String,
    pub display_name: String,
    pub quality_selector: String,
    pub status: JobStatus,
    /// Set right before the download stage writes it
    pub input_path: Option<PathBuf>,
    /// Set right before the encoder writes it
    pub output_path: Option<PathBuf>,
    pub cancel: CancellationToken,
}

impl Job {
    pub fn new(id: Uuid, request: JobRequest, cancel: CancellationToken) -> Self {
        Self {
            id,
            owner_id: request.owner_id,
            destination: request.destination,
            source_reference: request.source_reference,
            display_name: request.display_name,
            quality_selector: request.quality_selector,
            status: JobStatus::Pending,
            input_path: None,
            output_path: None,
            cancel,
        }
    }

    /// Moves to `next` if the transition is legal; returns whether it moved.
    pub fn advance(&mut self, next: JobStatus) -> bool {
        if !self.status.can_advance_to(next) {
            log::warn!(
                "Job {} (owner {}): ignoring illegal transition {} -> {}",
                self.id,
                self.owner_id,
                self.status,
                next
            );
            return false;
        }
        self.status = next;
        true
    }

    pub fn report(&self, error: Option<String>) -> JobReport {
        JobReport {
            job_id: self.id,
            owner_id: self.owner_id,
            status: self.status,
            error,
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
        }
    }
}

/// Final state of a finished job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub job_id: Uuid,
    pub owner_id: OwnerId,
    /// Always terminal
    pub status: JobStatus,
    /// Full error text when `status` is `Failed`
    pub error: Option<String>,
    /// Scratch paths the job used; already deleted
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}
