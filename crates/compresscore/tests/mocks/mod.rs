//! Stand-ins for the chat platform and the encoder
//!
//! Every stub records what it was asked to do so tests can assert on
//! stage order and on which stages never ran.

#![allow(dead_code)] // Each test binary uses a different subset

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use compresscore::conversion::{EncodeError, EncodeResult, Encoder, Quality};
use compresscore::transfer::{MediaTransfer, TransferError, TransferResult};
use compresscore::{JobStatus, ProgressSink, ProgressUpdate};

// ============================================================================
// Transfer
// ============================================================================

/// Behaviour of [`StubTransfer`]
#[derive(Debug, Clone, Default)]
pub struct StubTransferConfig {
    /// Time the download takes after writing its file
    pub download_delay: Duration,
    pub fail_download: bool,
    pub fail_upload: bool,
}

/// Upload as seen by the stub
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub path: PathBuf,
    pub display_name: String,
    pub destination: i64,
    /// Whether the file was on disk while uploading
    pub file_present: bool,
}

#[derive(Debug, Default)]
pub struct StubTransfer {
    config: StubTransferConfig,
    download_calls: AtomicU32,
    downloads: Mutex<Vec<PathBuf>>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl StubTransfer {
    pub fn new(config: StubTransferConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn download_calls(&self) -> u32 {
        self.download_calls.load(Ordering::SeqCst)
    }

    /// Paths written by download so far
    pub fn downloads(&self) -> Vec<PathBuf> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaTransfer for StubTransfer {
    async fn download(
        &self,
        source_reference: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> TransferResult<PathBuf> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.config.fail_download {
            return Err(TransferError::platform(format!("file {} is gone", source_reference)));
        }

        tokio::fs::write(dest, b"source media").await?;
        self.downloads.lock().unwrap().push(dest.to_path_buf());

        tokio::select! {
            _ = cancel.cancelled() => Err(TransferError::Cancelled),
            _ = tokio::time::sleep(self.config.download_delay) => Ok(dest.to_path_buf()),
        }
    }

    async fn upload(&self, local_path: &Path, display_name: &str, destination: i64) -> TransferResult<()> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            path: local_path.to_path_buf(),
            display_name: display_name.to_string(),
            destination,
            file_present: local_path.exists(),
        });
        if self.config.fail_upload {
            return Err(TransferError::platform("Request Entity Too Large"));
        }
        Ok(())
    }
}

// ============================================================================
// Encoder
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubEncoderMode {
    /// Writes the output file and succeeds
    Succeed,
    /// Exits as ffmpeg would with the given code
    Fail(i32),
    /// Writes a partial output, then runs until cancelled
    RunUntilCancelled,
}

#[derive(Debug)]
pub struct StubEncoder {
    mode: StubEncoderMode,
    calls: AtomicU32,
    qualities: Mutex<Vec<Quality>>,
}

impl StubEncoder {
    pub fn new(mode: StubEncoderMode) -> Self {
        Self {
            mode,
            calls: AtomicU32::new(0),
            qualities: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn qualities(&self) -> Vec<Quality> {
        self.qualities.lock().unwrap().clone()
    }
}

#[async_trait]
impl Encoder for StubEncoder {
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        quality: Quality,
        cancel: &CancellationToken,
    ) -> EncodeResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.qualities.lock().unwrap().push(quality);
        assert!(input.exists(), "encoder input {} missing", input.display());

        match self.mode {
            StubEncoderMode::Succeed => {
                tokio::fs::write(output, b"compressed media").await?;
                Ok(())
            }
            StubEncoderMode::Fail(code) => Err(EncodeError::Failed {
                exit_code: Some(code),
                stderr_excerpt: "Invalid data found when processing input".to_string(),
            }),
            StubEncoderMode::RunUntilCancelled => {
                tokio::fs::write(output, b"partial").await?;
                cancel.cancelled().await;
                Err(EncodeError::Cancelled)
            }
        }
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Collects every update; optionally fails each report after recording it
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<ProgressUpdate>>,
    failing: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<JobStatus> {
        self.updates().into_iter().map(|u| u.status).collect()
    }

    pub fn last(&self) -> Option<ProgressUpdate> {
        self.updates().pop()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn report(&self, update: &ProgressUpdate) -> anyhow::Result<()> {
        self.updates.lock().unwrap().push(update.clone());
        if self.failing {
            anyhow::bail!("message to edit not found");
        }
        Ok(())
    }
}
