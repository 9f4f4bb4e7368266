//! Command handlers: /start, /cancel, /help

use indoc::formatdoc;
use strum::IntoEnumIterator;
use teloxide::prelude::*;
use teloxide::types::Message;

use compresscore::Quality;

use super::types::{owner_of, HandlerDeps, HandlerError};

pub const CANCEL_OK_TEXT: &str = "🛑 Task cancelled successfully.";
pub const CANCEL_NONE_TEXT: &str = "⚠️ No active task to cancel.";

fn tier_list() -> String {
    Quality::iter().map(Quality::label).collect::<Vec<_>>().join(", ")
}

pub fn welcome_text() -> String {
    formatdoc! {"
        👋 Welcome to CompressMaster!

        Send me any video and I will compress it.
        Choose from {tiers}.",
        tiers = tier_list(),
    }
}

pub fn help_text() -> String {
    formatdoc! {"
        1. Send a video (or a video file as a document).
        2. Pick a quality: {tiers}.
        3. Wait for the compressed video to come back.

        /cancel stops the compression that is running.
        You can run one compression at a time.",
        tiers = tier_list(),
    }
}

pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, welcome_text()).await?;
    Ok(())
}

pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, help_text()).await?;
    Ok(())
}

pub(super) async fn handle_cancel_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(owner) = msg.from.as_ref().and_then(owner_of) else {
        return Ok(());
    };

    let reply = if deps.coordinator.cancel_job(owner) {
        CANCEL_OK_TEXT
    } else {
        CANCEL_NONE_TEXT
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
