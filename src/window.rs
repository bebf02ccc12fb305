// src/window.rs
use chrono::TimeZone;

use crate::error::InsightError;
use crate::models::Transaction;

/// Epoch seconds of January 1 of `reference_year - 1`, local midnight in `tz`.
pub fn window_start<Tz: TimeZone>(tz: &Tz, reference_year: i32) -> Result<i64, InsightError> {
    let year = reference_year - 1;
    tz.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or(InsightError::InvalidWindowStart(year))
}

/// Keep every transaction at or after `lower_bound`, in input order.
/// There is no upper bound: future-dated entries pass.
pub fn filter_window(transactions: &[Transaction], lower_bound: i64) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.timestamp >= lower_bound)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn tx_at(hash: &str, timestamp: i64) -> Transaction {
        Transaction {
            hash: hash.into(),
            block_number: None,
            timestamp,
            from: "0xa".into(),
            to: "0xb".into(),
            value_wei: 0,
            gas_price_wei: 0,
            gas_used: 0,
            succeeded: true,
        }
    }

    #[test]
    fn start_is_january_first_of_previous_year() {
        // 2024-01-01T00:00:00Z
        assert_eq!(window_start(&Utc, 2025).unwrap(), 1_704_067_200);
    }

    #[test]
    fn start_follows_the_reference_zone() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(window_start(&cet, 2025).unwrap(), 1_704_067_200 - 3600);
    }

    #[test]
    fn bound_is_inclusive_and_one_sided() {
        let lower = 1_704_067_200;
        let txs = vec![
            tx_at("before", lower - 1),
            tx_at("edge", lower),
            tx_at("future", lower + 10 * 365 * 86_400),
        ];
        let kept: Vec<&str> = filter_window(&txs, lower)
            .iter()
            .map(|tx| tx.hash.as_str())
            .collect();
        assert_eq!(kept, vec!["edge", "future"]);
    }

    #[test]
    fn filtering_is_an_order_preserving_subsequence() {
        let lower = 1_000;
        let stamps = [5_000, 10, 1_000, 999, 2_000, 1_500, 0, 3_000];
        let txs: Vec<Transaction> = stamps
            .iter()
            .enumerate()
            .map(|(i, ts)| tx_at(&format!("t{}", i), *ts))
            .collect();

        let kept = filter_window(&txs, lower);
        let expected: Vec<&Transaction> = txs.iter().filter(|tx| tx.timestamp >= lower).collect();
        assert_eq!(kept, expected);
        assert!(kept.iter().all(|tx| tx.timestamp >= lower));
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn empty_input_gives_empty_window() {
        assert!(filter_window(&[], 0).is_empty());
        assert!(filter_window(&[tx_at("old", 1)], 2).is_empty());
    }
}
