//! Runtime configuration read from the environment.
//!
//! `.env` is loaded by the binary before [`Settings::from_env`] runs, so
//! every value here can come either from the process environment or from
//! that file.

use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Default scratch directory, relative to the working directory
pub const DEFAULT_TEMP_DIR: &str = "temp";

/// Default encoder binary
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Default log file path
pub const DEFAULT_LOG_FILE_PATH: &str = "compressbot.log";

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for uploading a full-size compressed video
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Pending upload configuration
pub mod pending {
    use super::Duration;

    /// How long an uploaded video waits for a quality choice (in seconds)
    pub const SELECTION_TTL_SECS: u64 = 3600;

    /// Maximum number of remembered uploads awaiting a choice
    pub const MAX_PENDING: u64 = 10_000;

    pub fn selection_ttl() -> Duration {
        Duration::from_secs(SELECTION_TTL_SECS)
    }
}

/// Bot settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bot API token, from BOT_TOKEN or TELOXIDE_TOKEN (required)
    pub bot_token: SecretString,
    /// Scratch directory for downloaded and encoded media, from TEMP_DIR
    pub temp_dir: PathBuf,
    /// Encoder binary, from FFMPEG_BIN
    pub ffmpeg_bin: String,
    /// Hard limit for one encoder run, from ENCODE_TIMEOUT_SECS (unset or 0 = none)
    pub encode_timeout: Option<Duration>,
    /// Log file path, from LOG_FILE_PATH
    pub log_file_path: PathBuf,
    /// Custom Bot API server, from BOT_API_URL
    pub bot_api_url: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when the bot token is missing or a
    /// numeric value cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key).and_then(|value| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let bot_token = non_empty("BOT_TOKEN")
            .or_else(|| non_empty("TELOXIDE_TOKEN"))
            .ok_or_else(|| AppError::config("BOT_TOKEN missing in environment"))?;

        let temp_dir = non_empty("TEMP_DIR").unwrap_or_else(|| DEFAULT_TEMP_DIR.to_string());
        let temp_dir = PathBuf::from(shellexpand::tilde(&temp_dir).into_owned());

        let encode_timeout = match non_empty("ENCODE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| AppError::config(format!("ENCODE_TIMEOUT_SECS is not a number: {raw}")))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let log_file_path = non_empty("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string());

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            temp_dir,
            ffmpeg_bin: non_empty("FFMPEG_BIN").unwrap_or_else(|| DEFAULT_FFMPEG_BIN.to_string()),
            encode_timeout,
            log_file_path: PathBuf::from(shellexpand::tilde(&log_file_path).into_owned()),
            bot_api_url: non_empty("BOT_API_URL"),
        })
    }

    /// The token in plain text, for handing to the Bot API client.
    pub fn bot_token(&self) -> &str {
        self.bot_token.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = Settings::from_lookup(lookup_from(&[("TEMP_DIR", "/tmp/x")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_blank_token_is_fatal() {
        let result = Settings::from_lookup(lookup_from(&[("BOT_TOKEN", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[("BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(settings.bot_token(), "123:abc");
        assert_eq!(settings.temp_dir, PathBuf::from("temp"));
        assert_eq!(settings.ffmpeg_bin, "ffmpeg");
        assert!(settings.encode_timeout.is_none());
        assert!(settings.bot_api_url.is_none());
        assert_eq!(settings.log_file_path, PathBuf::from("compressbot.log"));
    }

    #[test]
    fn test_teloxide_token_fallback() {
        let settings = Settings::from_lookup(lookup_from(&[("TELOXIDE_TOKEN", "42:xyz")])).unwrap();
        assert_eq!(settings.bot_token(), "42:xyz");
    }

    #[test]
    fn test_encode_timeout() {
        let settings = Settings::from_lookup(lookup_from(&[("BOT_TOKEN", "t"), ("ENCODE_TIMEOUT_SECS", "90")])).unwrap();
        assert_eq!(settings.encode_timeout, Some(Duration::from_secs(90)));

        let settings = Settings::from_lookup(lookup_from(&[("BOT_TOKEN", "t"), ("ENCODE_TIMEOUT_SECS", "0")])).unwrap();
        assert!(settings.encode_timeout.is_none());

        let result = Settings::from_lookup(lookup_from(&[("BOT_TOKEN", "t"), ("ENCODE_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_token_not_in_debug_output() {
        let settings = Settings::from_lookup(lookup_from(&[("BOT_TOKEN", "super-secret-token")])).unwrap();
        assert!(!format!("{:?}", settings).contains("super-secret-token"));
    }
}
