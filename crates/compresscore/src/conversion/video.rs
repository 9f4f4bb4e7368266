//! ffmpeg-backed encoder
//!
//! One run per job: H.264 + AAC, scaled to the tier height, with
//! `+faststart` so Telegram can stream the result before it is fully
//! downloaded.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::{EncodeError, EncodeProfile, EncodeResult, Encoder, Quality};
use crate::core::process::{run_cancellable, stderr_excerpt, ProcessOutcome};

/// How much of ffmpeg's stderr is kept in [`EncodeError::Failed`]
pub const STDERR_EXCERPT_BYTES: usize = 512;

/// Runs the configured ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: String,
    timeout: Option<Duration>,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill the encoder if a single run takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

/// Full ffmpeg argument list for one encode
pub fn build_args(input: &Path, output: &Path, profile: &EncodeProfile) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());

    let scale = format!("scale=-2:{}", profile.height);
    let crf = profile.crf.to_string();
    args.extend(
        [
            "-vf",
            scale.as_str(),
            "-c:v",
            "libx264",
            "-preset",
            profile.preset,
            "-crf",
            crf.as_str(),
            "-c:a",
            "aac",
            "-b:a",
            profile.audio_bitrate,
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        quality: Quality,
        cancel: &CancellationToken,
    ) -> EncodeResult<()> {
        if cancel.is_cancelled() {
            return Err(EncodeError::Cancelled);
        }

        let profile = quality.profile();
        let mut cmd = Command::new(&self.binary);
        cmd.args(build_args(input, output, &profile));

        log::info!(
            "🎬 Encoding {} -> {} ({}p, crf {})",
            input.display(),
            output.display(),
            profile.height,
            profile.crf
        );

        match run_cancellable(&mut cmd, cancel, self.timeout).await? {
            ProcessOutcome::Exited { status, .. } if status.success() => {
                if fs_err::tokio::metadata(output).await.is_err() {
                    return Err(EncodeError::OutputMissing(output.to_path_buf()));
                }
                Ok(())
            }
            ProcessOutcome::Exited { status, stderr } => {
                let excerpt = stderr_excerpt(&stderr, STDERR_EXCERPT_BYTES);
                log::error!("FFmpeg compression error (code {:?}): {}", status.code(), excerpt);
                Err(EncodeError::Failed {
                    exit_code: status.code(),
                    stderr_excerpt: excerpt,
                })
            }
            ProcessOutcome::Cancelled => Err(EncodeError::Cancelled),
            ProcessOutcome::TimedOut(limit) => Err(EncodeError::TimedOut(limit)),
        }
    }
}
