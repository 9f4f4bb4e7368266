//! CompressMaster core: everything the bot does except talking to Telegram.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `scratch`: per-job temporary file paths and their cleanup
//! - `conversion`: quality tiers and the ffmpeg transcode invoker
//! - `transfer`: download/upload contract implemented by the chat layer
//! - `jobs`: job registry and the lifecycle coordinator

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod conversion;
pub mod core;
pub mod jobs;
pub mod scratch;
pub mod transfer;

// Re-export commonly used types for convenience
pub use conversion::{Encoder, EncodeError, FfmpegEncoder, Quality};
pub use crate::core::{AppError, Settings};
pub use jobs::{
    Coordinator, JobError, JobHandle, JobReport, JobRequest, JobStatus, OwnerId, ProgressSink, ProgressUpdate,
};
pub use scratch::ScratchSpace;
pub use transfer::{MediaTransfer, TransferError};
