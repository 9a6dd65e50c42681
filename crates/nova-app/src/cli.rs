use std::path::PathBuf;

use clap::Parser;

/// Nova: terminal front end for the chat and site-build assistant.
#[derive(Parser, Debug)]
#[command(name = "nova", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Service base URL override.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Stream assistant replies as they are generated.
    #[arg(long)]
    pub stream: bool,

    /// Keep the session in memory only.
    #[arg(long)]
    pub ephemeral: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
