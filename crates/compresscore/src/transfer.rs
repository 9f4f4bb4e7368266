//! Transfer stages: getting media from the chat and sending it back.
//!
//! The coordinator only sees this trait; the Telegram implementation lives
//! in the bot crate.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from a transfer stage
#[derive(Error, Debug)]
pub enum TransferError {
    /// Chat platform rejected or failed the request
    #[error("Platform error: {0}")]
    Platform(String),

    /// Local file could not be written or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-flight transfer was aborted by the job's cancel token
    #[error("Transfer cancelled")]
    Cancelled,
}

impl TransferError {
    pub fn platform(msg: impl std::fmt::Display) -> Self {
        TransferError::Platform(msg.to_string())
    }
}

pub type TransferResult<T> = Result<T, TransferError>;

/// Download/upload contract the coordinator drives.
#[async_trait]
pub trait MediaTransfer: Send + Sync {
    /// Fetch the media behind `source_reference` into `dest`.
    ///
    /// Returns the path actually written (normally `dest`). Should give up
    /// with [`TransferError::Cancelled`] once `cancel` fires.
    async fn download(
        &self,
        source_reference: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> TransferResult<PathBuf>;

    /// Send `local_path` to the chat `destination` under `display_name`.
    ///
    /// Must leave the file in place; the coordinator owns its cleanup.
    async fn upload(&self, local_path: &Path, display_name: &str, destination: i64) -> TransferResult<()>;
}
