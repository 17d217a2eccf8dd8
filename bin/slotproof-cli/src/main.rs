// SPDX-License-Identifier: MIT
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slotproof", version, about = "Verify Ethereum storage inclusion proofs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output results as JSON.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a storage proof and block header into a bundle file.
    Fetch(commands::fetch::FetchArgs),

    /// Verify a previously fetched bundle offline.
    Verify(commands::verify::VerifyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, cli.json).await,
        Commands::Verify(args) => commands::verify::run(args, cli.json).await,
    }
}
