// src/wrapped.rs
use chrono::{DateTime, TimeZone};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::WrappedError;
use crate::etherscan::EtherscanClient;
use crate::insights;
use crate::models::{Insight, RawTransaction};
use crate::parser;

/// Reject blank input before anything touches the network.
pub fn validate_address(address: &str) -> Result<&str, WrappedError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(WrappedError::MissingAddress);
    }
    Ok(trimmed)
}

/// Ingest explorer records and derive the slides.
pub fn insights_from_raw<Tz: TimeZone>(
    raws: &[RawTransaction],
    address: &str,
    reference: &DateTime<Tz>,
) -> Result<Vec<Insight>, WrappedError> {
    let address = validate_address(address)?;
    let transactions = parser::decode_transactions(raws)?;
    Ok(insights::compute_insights(&transactions, address, reference)?)
}

/// One full "get my wrapped" action: validate, fetch, compute.
pub async fn get_wrapped<Tz: TimeZone>(
    client: &EtherscanClient,
    address: &str,
    reference: &DateTime<Tz>,
    cancel: &CancellationToken,
) -> Result<Vec<Insight>, WrappedError> {
    let address = validate_address(address)?;
    let raws = client.fetch_transactions(address, cancel).await?;
    let slides = insights_from_raw(&raws, address, reference)?;
    info!("Built {} slides for {}", slides.len(), address);
    Ok(slides)
}
