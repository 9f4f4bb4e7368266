//! Quality tiers and the encoder parameters behind them

use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::EncodeError;

/// Target resolution offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Quality {
    #[strum(to_string = "480", serialize = "480p")]
    P480,
    #[strum(to_string = "720", serialize = "720p")]
    P720,
    #[strum(to_string = "1080", serialize = "1080p")]
    P1080,
}

/// Encoder parameters for one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeProfile {
    /// Output height in pixels; width follows the aspect ratio
    pub height: u32,
    /// x264 constant rate factor (higher = smaller file)
    pub crf: u8,
    /// x264 preset
    pub preset: &'static str,
    /// AAC audio bitrate
    pub audio_bitrate: &'static str,
}

impl Quality {
    /// Parses a raw selector such as `"720"` or `"720p"`.
    ///
    /// # Errors
    /// [`EncodeError::InvalidQuality`] for anything outside the tier table.
    pub fn from_selector(selector: &str) -> Result<Self, EncodeError> {
        Quality::from_str(selector.trim()).map_err(|_| EncodeError::InvalidQuality(selector.to_string()))
    }

    /// Human label, e.g. `720p`
    pub fn label(self) -> String {
        format!("{}p", self)
    }

    pub fn profile(self) -> EncodeProfile {
        match self {
            Quality::P480 => EncodeProfile {
                height: 480,
                crf: 30,
                preset: "veryfast",
                audio_bitrate: "96k",
            },
            Quality::P720 => EncodeProfile {
                height: 720,
                crf: 28,
                preset: "veryfast",
                audio_bitrate: "128k",
            },
            Quality::P1080 => EncodeProfile {
                height: 1080,
                crf: 26,
                preset: "veryfast",
                audio_bitrate: "160k",
            },
        }
    }
}
