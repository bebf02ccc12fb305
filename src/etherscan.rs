// src/etherscan.rs
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{RawTransaction, TxListResponse};

/// Pause between attempts after a transport failure
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Full block range, newest first
const START_BLOCK: &str = "0";
const END_BLOCK: &str = "99999999";

/// Explorer client returning a wallet's complete normal-transaction history
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    client: Client,
    cfg: Config,
}

impl EtherscanClient {
    pub fn new(cfg: Config) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self { client, cfg })
    }

    /// Fetch every transaction of `address`, giving up early when `cancel` fires.
    pub async fn fetch_transactions(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawTransaction>, FetchError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                warn!("Fetch for {} cancelled", address);
                Err(FetchError::Cancelled)
            }
            res = self.fetch_with_retries(address) => res,
        }
    }

    async fn fetch_with_retries(&self, address: &str) -> Result<Vec<RawTransaction>, FetchError> {
        let mut attempt = 1;
        loop {
            match self.request_txlist(address).await {
                Ok(txs) => {
                    info!("📩 Received {} transactions for {}", txs.len(), address);
                    return Ok(txs);
                }
                Err(FetchError::Transport(e)) if attempt < self.cfg.retries => {
                    warn!(
                        "⚠️ Explorer request failed (attempt {}): {}. Retrying...",
                        attempt, e
                    );
                    tokio::time::sleep(RETRY_PAUSE).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn request_txlist(&self, address: &str) -> Result<Vec<RawTransaction>, FetchError> {
        let mut params = vec![
            ("module", "account"),
            ("action", "txlist"),
            ("address", address),
            ("startblock", START_BLOCK),
            ("endblock", END_BLOCK),
            ("sort", "desc"),
        ];
        if let Some(key) = self.cfg.api_key.as_deref() {
            params.push(("apikey", key));
        }

        info!("📡 Sending txlist → {} (address {})", self.cfg.api_url, address);

        let resp = self
            .client
            .get(&self.cfg.api_url)
            .query(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::HttpStatus(resp.status()));
        }

        let text = resp.text().await?;
        parse_txlist(&text)
    }
}

/// Decode a `txlist` body; anything but status "1" is a failure.
pub fn parse_txlist(body: &str) -> Result<Vec<RawTransaction>, FetchError> {
    let parsed: TxListResponse = serde_json::from_str(body)?;

    if parsed.status != "1" {
        // on failure `result` usually holds a human readable reason
        let detail = parsed.result.as_str().unwrap_or_default();
        return Err(FetchError::Upstream {
            status: parsed.status,
            message: format!("{} {}", parsed.message, detail).trim().to_string(),
        });
    }

    Ok(serde_json::from_value(parsed.result)?)
}
