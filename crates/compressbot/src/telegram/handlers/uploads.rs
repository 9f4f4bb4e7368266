//! Video upload handler

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{owner_of, HandlerDeps, HandlerError};
use crate::telegram::keyboard::quality_keyboard;
use crate::telegram::pending::PendingUpload;

pub const SELECT_QUALITY_TEXT: &str = "Select compression quality:";

/// Handler for video messages and video documents
pub(super) fn video_upload_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| PendingUpload::from_message(&msg))
        .endpoint(move |bot: Bot, msg: Message, upload: PendingUpload| {
            let deps = deps.clone();
            async move {
                let Some(owner) = msg.from.as_ref().and_then(owner_of) else {
                    return Ok(());
                };

                log::info!(
                    "🎞 Video from owner {}: {:?} ({})",
                    owner,
                    upload.file_name,
                    upload.file_id
                );
                deps.pending.remember(owner, upload).await;

                bot.send_message(msg.chat.id, SELECT_QUALITY_TEXT)
                    .reply_markup(quality_keyboard())
                    .await?;
                Ok(())
            }
        })
}
