//! Quality button handler: starts the compression job

use std::sync::Arc;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use compresscore::{JobError, JobRequest};

use super::types::{owner_of, HandlerDeps, HandlerError};
use crate::telegram::keyboard::parse_callback;
use crate::telegram::progress::{ChatProgress, DOWNLOADING_TEXT, FAILED_TEXT};

pub const NO_FILE_TEXT: &str = "❌ Error: No file found. Send video again.";
pub const ALREADY_RUNNING_TEXT: &str = "⏳ You already have a compression in progress. Use /cancel to stop it.";

/// Raw selector from a quality button
#[derive(Debug, Clone)]
struct QualityChoice(String);

/// Handler for `quality:<tier>` callback queries
pub(super) fn quality_callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter_map(|q: CallbackQuery| {
            q.data
                .as_deref()
                .and_then(parse_callback)
                .map(|selector| QualityChoice(selector.to_string()))
        })
        .endpoint(move |bot: Bot, q: CallbackQuery, choice: QualityChoice| {
            let deps = deps.clone();
            async move { handle_quality_choice(&bot, &q, choice, &deps).await }
        })
}

async fn handle_quality_choice(
    bot: &Bot,
    q: &CallbackQuery,
    choice: QualityChoice,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.regular_message() else {
        log::warn!("Quality callback without an accessible message from user {}", q.from.id);
        return Ok(());
    };
    let (chat_id, message_id) = (message.chat.id, message.id);
    let Some(owner) = owner_of(&q.from) else {
        return Ok(());
    };

    let Some(upload) = deps.pending.get(owner).await else {
        bot.edit_message_text(chat_id, message_id, NO_FILE_TEXT).await?;
        return Ok(());
    };

    // Keep the keyboard so the user can pick again after /cancel
    if deps.coordinator.is_active(owner) {
        bot.send_message(chat_id, ALREADY_RUNNING_TEXT).await?;
        return Ok(());
    }

    bot.edit_message_text(chat_id, message_id, DOWNLOADING_TEXT).await?;

    let request = JobRequest::new(owner, upload.file_id, upload.file_name, choice.0).with_destination(chat_id.0);
    let progress = Arc::new(ChatProgress::new(bot.clone(), chat_id, message_id));

    match deps.coordinator.start_job(request, progress) {
        Ok(handle) => {
            log::info!("Started job {} for owner {}", handle.id(), owner);
        }
        Err(JobError::Conflict(_)) => {
            bot.edit_message_text(chat_id, message_id, ALREADY_RUNNING_TEXT).await?;
        }
        Err(e) => {
            log::error!("Failed to start job for owner {}: {}", owner, e);
            bot.edit_message_text(chat_id, message_id, FAILED_TEXT).await?;
        }
    }
    Ok(())
}
