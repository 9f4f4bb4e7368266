//! Video transcoding through an external encoder process.
//!
//! The encoder is an external `ffmpeg` process. Callers pick a [`Quality`]
//! tier; the tier maps to a fixed parameter set. Every run can be cancelled
//! through a [`CancellationToken`], which kills the process.

pub mod quality;
pub mod video;

pub use quality::{EncodeProfile, Quality};
pub use video::FfmpegEncoder;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during transcoding
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Selector outside the fixed tier table; raised before any process starts
    #[error("Unknown quality selector: {0:?}")]
    InvalidQuality(String),

    /// Encoder exited with a non-zero status
    #[error("Encoder exited with code {exit_code:?}: {stderr_excerpt}")]
    Failed {
        exit_code: Option<i32>,
        stderr_excerpt: String,
    },

    /// Cancel token fired while the encoder was running
    #[error("Encoding cancelled")]
    Cancelled,

    #[error("Encoder timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// Encoder reported success but produced no file
    #[error("Encoder output missing: {}", .0.display())]
    OutputMissing(PathBuf),

    /// Encoder binary could not be started
    #[error("Failed to run encoder: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// A transcoder the coordinator can drive.
///
/// Implementations must return [`EncodeError::Cancelled`] promptly once
/// `cancel` fires, and must not leave a process running behind them.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode `input` into `output` using the parameters of `quality`.
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        quality: Quality,
        cancel: &CancellationToken,
    ) -> EncodeResult<()>;
}

/// Check if the encoder binary is available
pub async fn check_encoder(binary: &str) -> bool {
    tokio::process::Command::new(binary)
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_encoder_missing_binary() {
        assert!(!check_encoder("definitely-not-ffmpeg-4242").await);
    }

    #[test]
    fn test_error_messages() {
        let err = EncodeError::Failed {
            exit_code: Some(1),
            stderr_excerpt: "Invalid data found".to_string(),
        };
        assert_eq!(err.to_string(), "Encoder exited with code Some(1): Invalid data found");
        assert_eq!(
            EncodeError::TimedOut(Duration::from_secs(90)).to_string(),
            "Encoder timed out after 90s"
        );
        assert_eq!(
            EncodeError::InvalidQuality("4k".to_string()).to_string(),
            "Unknown quality selector: \"4k\""
        );
    }
}
