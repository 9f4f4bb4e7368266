//! Uploads waiting for a quality choice
//!
//! A user sends a video, then taps a quality button. Between the two the
//! file reference is kept here, one per user; a newer upload replaces the
//! older one. Entries expire after [`config::pending::SELECTION_TTL_SECS`].

use moka::future::Cache;
use std::time::Duration;
use teloxide::types::Message;

use compresscore::core::config;
use compresscore::OwnerId;

/// The video a user most recently sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    /// Telegram `file_id`
    pub file_id: String,
    pub file_name: Option<String>,
}

impl PendingUpload {
    /// Video carried by `msg`: a video message, or a document with a
    /// `video/*` MIME type.
    pub fn from_message(msg: &Message) -> Option<Self> {
        if let Some(video) = msg.video() {
            return Some(Self {
                file_id: video.file.id.0.clone(),
                file_name: video.file_name.clone(),
            });
        }

        msg.document()
            .filter(|doc| is_video_mime(doc.mime_type.as_ref().map(|m| m.essence_str())))
            .map(|doc| Self {
                file_id: doc.file.id.0.clone(),
                file_name: doc.file_name.clone(),
            })
    }
}

fn is_video_mime(essence: Option<&str>) -> bool {
    essence.is_some_and(|mime| mime.starts_with("video/"))
}

#[derive(Clone)]
pub struct PendingUploads {
    cache: Cache<OwnerId, PendingUpload>,
}

impl PendingUploads {
    pub fn new() -> Self {
        Self::with_ttl(config::pending::selection_ttl())
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(config::pending::MAX_PENDING)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub async fn remember(&self, owner: OwnerId, upload: PendingUpload) {
        self.cache.insert(owner, upload).await;
    }

    pub async fn get(&self, owner: OwnerId) -> Option<PendingUpload> {
        self.cache.get(&owner).await
    }
}

impl Default for PendingUploads {
    fn default() -> Self {
        Self::new()
    }
}
