//! Job lifecycle coordinator.
//!
//! [`Coordinator::start_job`] registers a job for its owner and spawns a
//! task that runs it: validate the quality choice, download, transcode,
//! upload. The cancel token is checked before every stage; the download
//! is abandoned and the encoder killed when it fires mid-stage. Upload is
//! not interruptible: a job cancelled while uploading can still complete.
//!
//! Whatever the outcome, the task deletes the job's scratch files and
//! removes its registry entry before reporting the terminal status. If the
//! task is dropped before it gets that far (runtime shutdown, abort,
//! panic), [`JobRunner`]'s `Drop` does the same cleanup synchronously.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::job::{Job, JobReport, JobRequest, JobStatus};
use super::registry::{ActiveJob, JobRegistry};
use super::{JobError, OwnerId, ProgressSink, ProgressUpdate};
use crate::conversion::{Encoder, Quality};
use crate::scratch::{extension_of, ScratchRole, ScratchSpace};
use crate::transfer::MediaTransfer;

/// Starts, cancels, and tracks compression jobs.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct Coordinator {
    registry: JobRegistry,
    scratch: ScratchSpace,
    encoder: Arc<dyn Encoder>,
    transfer: Arc<dyn MediaTransfer>,
}

impl Coordinator {
    pub fn new(scratch: ScratchSpace, encoder: Arc<dyn Encoder>, transfer: Arc<dyn MediaTransfer>) -> Self {
        Self {
            registry: JobRegistry::new(),
            scratch,
            encoder,
            transfer,
        }
    }

    /// Registers a job for `request.owner_id` and starts running it.
    ///
    /// Returns as soon as the job task is spawned. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    /// [`JobError::Conflict`] if the owner already has an active job.
    pub fn start_job(&self, request: JobRequest, progress: Arc<dyn ProgressSink>) -> Result<JobHandle, JobError> {
        let job_id = Uuid::new_v4();
        let owner_id = request.owner_id;
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(JobStatus::Pending);

        self.registry.try_register(
            owner_id,
            ActiveJob {
                job_id,
                cancel: cancel.clone(),
                status: status_rx.clone(),
            },
        )?;

        log::info!(
            "📦 Job {} started for owner {}: {:?} at quality {:?}",
            job_id,
            owner_id,
            request.display_name,
            request.quality_selector
        );

        let runner = JobRunner {
            job: Job::new(job_id, request, cancel.clone()),
            registry: self.registry.clone(),
            scratch: self.scratch.clone(),
            encoder: Arc::clone(&self.encoder),
            transfer: Arc::clone(&self.transfer),
            progress,
            status: status_tx,
            cleaned_up: false,
        };
        let task = tokio::spawn(runner.run());

        Ok(JobHandle {
            job_id,
            owner_id,
            cancel,
            status: status_rx,
            task,
        })
    }

    /// Raises the cancel signal of `owner`'s running job.
    ///
    /// Returns false (and changes nothing) when the owner has no running job.
    pub fn cancel_job(&self, owner: OwnerId) -> bool {
        let cancelled = self.registry.cancel(owner);
        if cancelled {
            log::info!("🛑 Cancel requested for owner {}", owner);
        } else {
            log::debug!("Cancel requested for owner {} with no active job", owner);
        }
        cancelled
    }

    pub fn is_active(&self, owner: OwnerId) -> bool {
        self.registry.contains(owner)
    }

    pub fn status(&self, owner: OwnerId) -> Option<JobStatus> {
        self.registry.status(owner)
    }

    /// Number of jobs currently registered
    pub fn active_jobs(&self) -> usize {
        self.registry.len()
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }
}

/// Caller's handle on a started job
#[derive(Debug)]
pub struct JobHandle {
    job_id: Uuid,
    owner_id: OwnerId,
    cancel: CancellationToken,
    status: watch::Receiver<JobStatus>,
    task: JoinHandle<JobReport>,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.job_id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Raises this job's cancel signal; same effect as [`Coordinator::cancel_job`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Latest published status
    pub fn status(&self) -> JobStatus {
        *self.status.borrow()
    }

    /// A receiver that wakes on every status change
    pub fn subscribe(&self) -> watch::Receiver<JobStatus> {
        self.status.clone()
    }

    /// Waits until the job has finished and cleaned up.
    pub async fn wait(self) -> JobReport {
        match self.task.await {
            Ok(report) => report,
            Err(join_err) => {
                // Runner's Drop already cleaned up; only the report is lost
                log::error!("Job {} task ended abnormally: {}", self.job_id, join_err);
                JobReport {
                    job_id: self.job_id,
                    owner_id: self.owner_id,
                    status: if join_err.is_cancelled() {
                        JobStatus::Cancelled
                    } else {
                        JobStatus::Failed
                    },
                    error: (!join_err.is_cancelled()).then(|| join_err.to_string()),
                    input_path: None,
                    output_path: None,
                }
            }
        }
    }
}

/// Owns one job while it runs. Dropping it before normal cleanup still
/// cleans up.
struct JobRunner {
    job: Job,
    registry: JobRegistry,
    scratch: ScratchSpace,
    encoder: Arc<dyn Encoder>,
    transfer: Arc<dyn MediaTransfer>,
    progress: Arc<dyn ProgressSink>,
    status: watch::Sender<JobStatus>,
    cleaned_up: bool,
}

impl JobRunner {
    async fn run(mut self) -> JobReport {
        self.report_progress(JobStatus::Pending, None).await;

        let (terminal, error) = match self.execute().await {
            Ok(()) => (JobStatus::Completed, None),
            Err(JobError::Cancelled) => (JobStatus::Cancelled, None),
            Err(e) => {
                log::error!("❌ Job {} for owner {} failed: {}", self.job.id, self.job.owner_id, e);
                (JobStatus::Failed, Some(e))
            }
        };

        self.job.advance(terminal);
        self.status.send_replace(terminal);
        self.cleanup().await;

        log::info!("Job {} for owner {} finished: {}", self.job.id, self.job.owner_id, terminal);
        let detail = error.as_ref().map(|e| e.user_summary().to_string());
        self.report_progress(terminal, detail).await;

        self.job.report(error.map(|e| e.to_string()))
    }

    async fn execute(&mut self) -> Result<(), JobError> {
        // Fail fast, before anything is downloaded
        let quality = Quality::from_selector(&self.job.quality_selector)?;
        let cancel = self.job.cancel.clone();

        // Download
        self.checkpoint()?;
        let input = self.scratch.allocate(
            self.job.id,
            ScratchRole::Input,
            extension_of(&self.job.display_name),
        );
        self.job.input_path = Some(input.clone());
        self.enter(JobStatus::Downloading, None).await;

        let downloaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JobError::Cancelled),
            result = self.transfer.download(&self.job.source_reference, &input, &cancel) => result?,
        };
        if downloaded != input {
            // Transfer chose its own path; track that one instead
            self.scratch.release(&input).await;
            self.job.input_path = Some(downloaded.clone());
        }

        // Transcode
        self.checkpoint()?;
        let output = self.scratch.allocate(self.job.id, ScratchRole::Output, "mp4");
        self.job.output_path = Some(output.clone());
        self.enter(JobStatus::Transcoding, Some(quality.label())).await;

        self.encoder.encode(&downloaded, &output, quality, &cancel).await?;

        // Upload; no cancellation past this point
        self.checkpoint()?;
        self.enter(JobStatus::Uploading, None).await;

        let name = delivery_name(&self.job.display_name);
        self.transfer.upload(&output, &name, self.job.destination).await?;

        Ok(())
    }

    fn checkpoint(&self) -> Result<(), JobError> {
        if self.job.cancel.is_cancelled() {
            log::info!("Job {} for owner {} observed cancel in {}", self.job.id, self.job.owner_id, self.job.status);
            return Err(JobError::Cancelled);
        }
        Ok(())
    }

    async fn enter(&mut self, next: JobStatus, detail: Option<String>) {
        if self.job.advance(next) {
            self.status.send_replace(next);
            log::info!("Job {} for owner {}: {}", self.job.id, self.job.owner_id, next);
            self.report_progress(next, detail).await;
        }
    }

    async fn report_progress(&self, status: JobStatus, detail: Option<String>) {
        let update = ProgressUpdate {
            owner_id: self.job.owner_id,
            job_id: self.job.id,
            status,
            detail,
        };
        if let Err(e) = self.progress.report(&update).await {
            log::warn!("Progress update {} for owner {} failed: {:#}", status, self.job.owner_id, e);
        }
    }

    async fn cleanup(&mut self) {
        for path in [&self.job.input_path, &self.job.output_path].into_iter().flatten() {
            self.scratch.release(path).await;
        }
        self.registry.remove(self.job.owner_id, self.job.id);
        self.cleaned_up = true;
    }
}

impl Drop for JobRunner {
    fn drop(&mut self) {
        if self.cleaned_up {
            return;
        }

        let status = if std::thread::panicking() {
            JobStatus::Failed
        } else {
            JobStatus::Cancelled
        };
        log::warn!(
            "Job {} for owner {} dropped while {}; cleaning up",
            self.job.id,
            self.job.owner_id,
            self.job.status
        );

        self.job.advance(status);
        self.status.send_replace(self.job.status);
        for path in [&self.job.input_path, &self.job.output_path].into_iter().flatten() {
            self.scratch.release_blocking(path);
        }
        self.registry.remove(self.job.owner_id, self.job.id);
    }
}

/// File name the result is delivered under: the original stem with `.mp4`
fn delivery_name(display_name: &str) -> String {
    let stem = Path::new(display_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("video");
    PathBuf::from(stem).with_extension("mp4").to_string_lossy().into_owned()
}
