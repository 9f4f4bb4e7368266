//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command list registration

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use compresscore::core::config;
use compresscore::Settings;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "stop your running compression")]
    Cancel,
    #[command(description = "how to use the bot")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to create bot (invalid URL, HTTP client setup)
pub fn create_bot(settings: &Settings) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(settings.bot_token(), client);

    // Check if local Bot API server is configured
    let bot = match &settings.bot_api_url {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::path::PathBuf;

    fn settings(bot_api_url: Option<&str>) -> Settings {
        Settings {
            bot_token: SecretString::from("123456:TEST"),
            temp_dir: PathBuf::from("temp"),
            ffmpeg_bin: "ffmpeg".to_string(),
            encode_timeout: None,
            log_file_path: PathBuf::from("compressbot.log"),
            bot_api_url: bot_api_url.map(str::to_string),
        }
    }

    #[test]
    fn test_commands_parse() {
        assert_eq!(Command::parse("/start", "compressbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/cancel", "compressbot").unwrap(), Command::Cancel);
        assert_eq!(Command::parse("/help@compressbot", "compressbot").unwrap(), Command::Help);
        assert!(Command::parse("/compress", "compressbot").is_err());
    }

    #[test]
    fn test_command_list_registered() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert_eq!(names, vec!["start", "cancel", "help"]);
    }

    #[test]
    fn test_create_bot_with_custom_api_url() {
        let bot = create_bot(&settings(Some("http://localhost:8081"))).unwrap();
        assert_eq!(bot.api_url().as_str(), "http://localhost:8081/");
        assert_eq!(bot.token(), "123456:TEST");
    }

    #[test]
    fn test_create_bot_rejects_bad_api_url() {
        assert!(create_bot(&settings(Some("not a url"))).is_err());
    }
}
