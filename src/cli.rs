use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wallet-wrapped", version, about = "Your wallet's year, one slide at a time")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a wallet's history and print its wrapped slides
    Wrapped {
        /// Wallet address to look up
        address: String,
        /// Read a saved explorer txlist response instead of fetching
        #[arg(long)]
        input: Option<PathBuf>,
        /// Reveal one slide per Enter key press (q to quit)
        #[arg(long, conflicts_with = "json")]
        step: bool,
        /// Print the slides as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP API server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}
