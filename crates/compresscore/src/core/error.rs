use thiserror::Error;

/// Startup and configuration errors.
///
/// Job-level failures never surface here: they are converted into a
/// terminal job status by the coordinator (see [`crate::jobs::JobError`]).
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (scratch directory, log file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}
