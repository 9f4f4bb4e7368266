//! Handler types and dependencies

use teloxide::types::User;

use compresscore::{Coordinator, OwnerId};

use crate::telegram::pending::PendingUploads;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub coordinator: Coordinator,
    pub pending: PendingUploads,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(coordinator: Coordinator, pending: PendingUploads) -> Self {
        Self { coordinator, pending }
    }
}

/// Job owner for a Telegram user
pub(super) fn owner_of(user: &User) -> Option<OwnerId> {
    i64::try_from(user.id.0).ok().map(OwnerId)
}
