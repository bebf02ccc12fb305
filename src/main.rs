use chrono::Local;
use clap::Parser;
use eyre::WrapErr;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use wallet_wrapped::cli::{Cli, Commands};
use wallet_wrapped::config::{self, Config};
use wallet_wrapped::deck::SlideDeck;
use wallet_wrapped::etherscan::{self, EtherscanClient};
use wallet_wrapped::{api, wrapped, Insight, WrappedError};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)   // keep stdout for the slides
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = config::load()?;

    // Ctrl-C cancels any in-flight fetch and stops the server
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received, stopping...");
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Commands::Serve { port } => {
            let cfg = Config {
                port: port.unwrap_or(cfg.port),
                ..cfg
            };
            let client = EtherscanClient::new(cfg.clone())?;
            api::serve(cfg, client, cancel).await?;
            info!("API stopped.");
        }
        Commands::Wrapped {
            address,
            input,
            step,
            json,
        } => {
            let result = match input {
                Some(path) => from_file(&path, &address)?,
                None => {
                    let client = EtherscanClient::new(cfg)?;
                    wrapped::get_wrapped(&client, &address, &Local::now(), &cancel).await
                }
            };

            match result {
                Ok(slides) if json => println!("{}", serde_json::to_string_pretty(&slides)?),
                Ok(slides) if step => reveal(SlideDeck::new(slides)).await?,
                Ok(slides) => {
                    for (index, slide) in slides.iter().enumerate() {
                        println!("Slide {}: {}", index + 1, slide.text);
                    }
                }
                Err(e) => {
                    error!("Error fetching data: {}", e);
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn from_file(path: &Path, address: &str) -> eyre::Result<Result<Vec<Insight>, WrappedError>> {
    let body = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    Ok(etherscan::parse_txlist(&body)
        .map_err(WrappedError::from)
        .and_then(|raws| wrapped::insights_from_raw(&raws, address, &Local::now())))
}

/// Show one slide per Enter press, wrapping around, until `q` or end of input.
async fn reveal(mut deck: SlideDeck) -> eyre::Result<()> {
    let total = deck.len();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(slide) = deck.current() {
        println!("[{}/{}] {}", deck.position() + 1, total, slide.text);
        println!("      ({})  Enter for next, q to quit", slide.image);

        match lines.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("q") => break,
            Some(_) => {
                deck.advance();
            }
            None => break,
        }
    }

    Ok(())
}
