// src/error.rs
use thiserror::Error;

pub const MISSING_ADDRESS_MESSAGE: &str = "Please enter a wallet address.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch wallet data. Please try again.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("explorer returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("explorer returned status {status}: {message}")]
    Upstream { status: String, message: String },

    #[error("unexpected explorer payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("fetch cancelled")]
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("transaction {hash}: invalid {field} {value:?}")]
    InvalidField {
        hash: String,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsightError {
    #[error("no transactions in the trailing year window")]
    EmptyWindow,

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("cannot build January 1 of {0} in the reference time zone")]
    InvalidWindowStart(i32),

    #[error("fee total overflowed")]
    Overflow,
}

/// Everything that can go wrong during one "get my wrapped" action
#[derive(Debug, Error)]
pub enum WrappedError {
    #[error("wallet address is blank")]
    MissingAddress,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Insight(#[from] InsightError),
}

impl WrappedError {
    /// The only text the end user ever sees; the cause stays in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            WrappedError::MissingAddress => MISSING_ADDRESS_MESSAGE,
            _ => FETCH_FAILED_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_address_has_its_own_message() {
        assert_eq!(
            WrappedError::MissingAddress.user_message(),
            "Please enter a wallet address."
        );
    }

    #[test]
    fn every_other_failure_collapses_to_generic_message() {
        let upstream = WrappedError::from(FetchError::Upstream {
            status: "0".into(),
            message: "NOTOK".into(),
        });
        let empty = WrappedError::from(InsightError::EmptyWindow);
        assert_eq!(upstream.user_message(), FETCH_FAILED_MESSAGE);
        assert_eq!(empty.user_message(), FETCH_FAILED_MESSAGE);
    }
}
