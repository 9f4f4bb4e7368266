use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "compressbot")]
#[command(author, version, about = "Telegram bot that compresses videos to 480p, 720p or 1080p", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run,

    /// Validate configuration and probe the encoder, then exit
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
