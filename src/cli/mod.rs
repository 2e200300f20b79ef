//! Command-line interface for leadscan.

mod process;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "leadscan")]
#[command(about = "Contact lead extraction from scanned images")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Upload images for OCR and extract classified leads
    Process {
        /// Directory of images to process
        image_dir: PathBuf,
        /// Directory for the output tables
        output_dir: PathBuf,
        /// NGC API key (falls back to the environment / .env file)
        #[arg(long, env = "NGC_PERSONAL_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Seconds between status polls
        #[arg(long, default_value = "2")]
        poll_interval: u64,
        /// Ceiling on total poll attempts per image
        #[arg(long, default_value = "30")]
        max_polls: u32,
        /// Request timeout in seconds for API calls
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Classify lines from a local text file (no upload)
    Classify {
        /// Text file with one candidate line per row
        file: PathBuf,
    },
}

/// Entry point called by the binary after logging setup.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            image_dir,
            output_dir,
            api_key,
            poll_interval,
            max_polls,
            timeout,
        } => {
            let settings = Settings::new(api_key)
                .with_poll_interval(Duration::from_secs(poll_interval))
                .with_max_poll_attempts(max_polls)
                .with_request_timeout(Duration::from_secs(timeout));
            process::run(&image_dir, &output_dir, settings).await
        }
        Commands::Classify { file } => process::classify_file(&file),
    }
}
