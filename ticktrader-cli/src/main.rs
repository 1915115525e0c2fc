//! TickTrader Web API CLI
//!
//! Reads `TICKTRADER_ADDRESS`, `TICKTRADER_ID`, `TICKTRADER_KEY` and
//! `TICKTRADER_SECRET` from the environment (or `.env`) and prints the raw
//! response of the requested operation.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use ticktrader_web::TickTraderClient;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ticktrader_web=debug")),
        )
        .init();

    let cli = Cli::parse();

    let client = TickTraderClient::from_env().context("Failed to configure TickTrader client")?;
    info!("Using TickTrader Web API at {}", client.address());

    if let Err(e) = commands::execute(&client, cli.command).await {
        error!("Request failed: {}", e);
        return Err(e);
    }

    Ok(())
}
