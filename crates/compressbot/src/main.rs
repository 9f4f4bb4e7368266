//! CompressMaster bot entry point

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod telegram;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use cli::{Cli, Commands};
use compresscore::conversion::check_encoder;
use compresscore::core::{config, init_logger, install_panic_hook};
use compresscore::{Coordinator, FfmpegEncoder, ScratchSpace, Settings};
use telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, PendingUploads, TelegramTransfer};

/// Main entry point
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenvy::dotenv();

    install_panic_hook();

    // Logger goes up before the settings are checked so a bad config is logged too
    let settings = Settings::from_env();
    let log_file_path = settings
        .as_ref()
        .map(|s| s.log_file_path.clone())
        .unwrap_or_else(|_| PathBuf::from(config::DEFAULT_LOG_FILE_PATH));
    init_logger(&log_file_path)?;

    let settings = settings.inspect_err(|e| log::error!("Configuration error: {}", e))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(settings).await,
        Commands::Check => run_check(&settings).await,
    }
}

async fn run_bot(settings: Settings) -> Result<()> {
    log::info!("Starting bot...");

    let scratch = ScratchSpace::new(&settings.temp_dir);
    scratch.prepare().await?;
    log::info!("Scratch directory: {}", scratch.root().display());

    if !check_encoder(&settings.ffmpeg_bin).await {
        log::warn!(
            "Encoder '{}' is not available; every compression will fail until it is installed",
            settings.ffmpeg_bin
        );
    }

    let bot = create_bot(&settings)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let encoder = FfmpegEncoder::new(settings.ffmpeg_bin.clone()).with_timeout(settings.encode_timeout);
    let coordinator = Coordinator::new(
        scratch,
        Arc::new(encoder),
        Arc::new(TelegramTransfer::new(bot.clone())),
    );
    let deps = HandlerDeps::new(coordinator.clone(), PendingUploads::new());

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!(
        "Dispatcher shutdown gracefully ({} job(s) still running will be cleaned up)",
        coordinator.active_jobs()
    );
    Ok(())
}

/// Validates configuration and the encoder without connecting to Telegram
async fn run_check(settings: &Settings) -> Result<()> {
    log::info!("Checking configuration...");

    let scratch = ScratchSpace::new(&settings.temp_dir);
    scratch.prepare().await?;
    log::info!("✅ Scratch directory ready: {}", scratch.root().display());

    if !check_encoder(&settings.ffmpeg_bin).await {
        anyhow::bail!("Encoder '{}' not found or not working", settings.ffmpeg_bin);
    }
    log::info!("✅ Encoder '{}' is available", settings.ffmpeg_bin);

    match settings.encode_timeout {
        Some(limit) => log::info!("Encode timeout: {}s", limit.as_secs()),
        None => log::info!("Encode timeout: none"),
    }
    if let Some(url) = &settings.bot_api_url {
        log::info!("Bot API URL: {}", url);
    }

    log::info!("✅ Configuration OK");
    Ok(())
}
