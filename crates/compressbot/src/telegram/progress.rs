//! Job progress rendered into the chat
//!
//! The quality keyboard message becomes the status line of the job: every
//! transition edits it in place.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::{ApiError, RequestError};

use compresscore::{JobStatus, ProgressSink, ProgressUpdate};

pub const DOWNLOADING_TEXT: &str = "📥 Downloading...";
pub const UPLOADING_TEXT: &str = "📤 Uploading...";
pub const COMPLETED_TEXT: &str = "✅ Done!";
pub const CANCELLED_TEXT: &str = "❌ Compression cancelled.";
pub const FAILED_TEXT: &str = "⚠️ Compression failed.";

/// Text for a status; `None` when nothing should be shown.
///
/// `detail` is the quality label while transcoding and a short reason on
/// failure.
pub fn status_text(status: JobStatus, detail: Option<&str>) -> Option<String> {
    let text = match status {
        // The callback already switched the message to the first stage
        JobStatus::Pending => return None,
        JobStatus::Downloading => DOWNLOADING_TEXT.to_string(),
        JobStatus::Transcoding => match detail {
            Some(label) => format!("🎬 Compressing ({})...", label),
            None => "🎬 Compressing...".to_string(),
        },
        JobStatus::Uploading => UPLOADING_TEXT.to_string(),
        JobStatus::Completed => COMPLETED_TEXT.to_string(),
        JobStatus::Cancelled => CANCELLED_TEXT.to_string(),
        JobStatus::Failed => match detail {
            Some(reason) => format!("{}\nReason: {}", FAILED_TEXT, reason),
            None => FAILED_TEXT.to_string(),
        },
    };
    Some(text)
}

/// Progress sink editing one chat message
pub struct ChatProgress {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl ChatProgress {
    pub fn new(bot: Bot, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
        }
    }
}

#[async_trait]
impl ProgressSink for ChatProgress {
    async fn report(&self, update: &ProgressUpdate) -> anyhow::Result<()> {
        let Some(text) = status_text(update.status, update.detail.as_deref()) else {
            return Ok(());
        };

        match self.bot.edit_message_text(self.chat_id, self.message_id, text).await {
            Ok(_) => Ok(()),
            // Same text as before; Telegram refuses no-op edits
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
