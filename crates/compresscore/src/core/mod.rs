//! Core utilities: configuration, errors, and logging

pub mod config;
pub mod error;
pub mod logging;
pub mod process;

// Re-exports for convenience
pub use config::Settings;
pub use error::{AppError, AppResult};
pub use logging::{init_logger, install_panic_hook};
