//! Leadscan - contact lead extraction from scanned images.
//!
//! Submits scanned attendee lists and business cards to NVIDIA's hosted
//! OCDRNet OCR function, classifies the recognized text into person and
//! company names, and writes the results as CSV tables.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if leadscan::cli::is_verbose() {
        "leadscan=info"
    } else {
        "leadscan=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    leadscan::cli::run().await
}
