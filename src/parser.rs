// src/parser.rs
use crate::error::ParseError;
use crate::models::{RawTransaction, Transaction};

fn parse_field<T: std::str::FromStr>(
    raw: &RawTransaction,
    field: &'static str,
    value: &str,
) -> Result<T, ParseError> {
    value.trim().parse::<T>().map_err(|_| ParseError::InvalidField {
        hash: raw.hash.clone(),
        field,
        value: value.to_string(),
    })
}

/// Coerce one explorer record into a typed `Transaction`
pub fn decode_transaction(raw: &RawTransaction) -> Result<Transaction, ParseError> {
    let timestamp = parse_field::<i64>(raw, "timeStamp", &raw.timestamp)?;
    let value_wei = parse_field::<u128>(raw, "value", &raw.value)?;
    let gas_price_wei = parse_field::<u128>(raw, "gasPrice", &raw.gas_price)?;
    let gas_used = parse_field::<u128>(raw, "gasUsed", &raw.gas_used)?;

    // informational only, never used by the statistics
    let block_number = raw.block_number.trim().parse::<u64>().ok();

    Ok(Transaction {
        hash: raw.hash.clone(),
        block_number,
        timestamp,
        from: raw.from.clone(),
        to: raw.to.clone(),
        value_wei,
        gas_price_wei,
        gas_used,
        succeeded: raw.is_error == "0",
    })
}

/// Decode a whole `txlist` result; the first malformed record fails the batch
pub fn decode_transactions(raws: &[RawTransaction]) -> Result<Vec<Transaction>, ParseError> {
    raws.iter().map(decode_transaction).collect()
}
