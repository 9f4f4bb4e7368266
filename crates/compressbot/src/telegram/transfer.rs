//! Telegram side of the transfer stages

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use compresscore::transfer::{MediaTransfer, TransferError, TransferResult};

/// Downloads uploads from and sends results to Telegram.
#[derive(Clone)]
pub struct TelegramTransfer {
    bot: Bot,
}

impl TelegramTransfer {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn fetch(&self, file_id: &str, dest: &Path) -> TransferResult<PathBuf> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(TransferError::platform)?;
        log::info!("📥 Downloading {} ({} bytes) to {}", file_id, file.meta.size, dest.display());

        let mut out = tokio::fs::File::create(dest).await?;
        self.bot
            .download_file(&file.path, &mut out)
            .await
            .map_err(TransferError::platform)?;
        out.flush().await?;

        Ok(dest.to_path_buf())
    }
}

#[async_trait]
impl MediaTransfer for TelegramTransfer {
    async fn download(
        &self,
        source_reference: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> TransferResult<PathBuf> {
        tokio::select! {
            _ = cancel.cancelled() => {
                log::info!("Download of {} cancelled", source_reference);
                Err(TransferError::Cancelled)
            }
            result = self.fetch(source_reference, dest) => result,
        }
    }

    async fn upload(&self, local_path: &Path, display_name: &str, destination: i64) -> TransferResult<()> {
        log::info!("📤 Sending {} to chat {} as {}", local_path.display(), destination, display_name);
        self.bot
            .send_video(
                ChatId(destination),
                InputFile::file(local_path.to_path_buf()).file_name(display_name.to_string()),
            )
            .supports_streaming(true)
            .await
            .map_err(TransferError::platform)?;
        Ok(())
    }
}
