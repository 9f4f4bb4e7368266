//! Quality selection keyboard

use strum::IntoEnumIterator;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use compresscore::Quality;

/// Prefix of every quality button's callback data
pub const CALLBACK_PREFIX: &str = "quality:";

/// One row: `480p | 720p | 1080p`
pub fn quality_keyboard() -> InlineKeyboardMarkup {
    let row: Vec<InlineKeyboardButton> = Quality::iter()
        .map(|quality| InlineKeyboardButton::callback(quality.label(), callback_data(quality)))
        .collect();
    InlineKeyboardMarkup::new(vec![row])
}

pub fn callback_data(quality: Quality) -> String {
    format!("{}{}", CALLBACK_PREFIX, quality)
}

/// Raw selector carried by a quality button, validated later by the job.
pub fn parse_callback(data: &str) -> Option<&str> {
    data.strip_prefix(CALLBACK_PREFIX)
}
