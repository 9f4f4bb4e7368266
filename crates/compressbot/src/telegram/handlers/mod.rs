//! Update handlers
//!
//! - `schema`: dispatcher tree
//! - `commands`: /start, /cancel, /help
//! - `uploads`: incoming videos
//! - `callbacks`: quality buttons

mod callbacks;
mod commands;
mod schema;
mod types;
mod uploads;

pub use schema::schema;
pub use types::HandlerDeps;
