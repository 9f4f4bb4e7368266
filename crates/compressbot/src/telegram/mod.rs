//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod keyboard;
pub mod pending;
pub mod progress;
pub mod transfer;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands};
pub use handlers::{schema, HandlerDeps};
pub use pending::PendingUploads;
pub use transfer::TelegramTransfer;
