// src/aggregator.rs
use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Month, TimeZone};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::InsightError;
use crate::models::Transaction;

/// 1 ETH = 10^18 wei
pub const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

/// Average per day always divides by a plain 365
pub const DAYS_PER_YEAR: u64 = 365;

/// Success rates strictly above this get the congratulating message
pub const SUCCESS_RATE_THRESHOLD: u64 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthActivity {
    pub month: Month,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counterpart<'a> {
    pub address: &'a str,
    pub count: usize,
}

pub fn wei_to_eth(wei: u128) -> Result<Decimal, InsightError> {
    let wei = Decimal::from_u128(wei).ok_or(InsightError::Overflow)?;
    Ok(wei / Decimal::from(WEI_PER_ETH))
}

pub fn transaction_count(window: &[&Transaction]) -> usize {
    window.len()
}

/// Highest `value_wei`; on ties the earliest transaction in window order wins.
pub fn largest_transfer<'a>(window: &[&'a Transaction]) -> Option<&'a Transaction> {
    window.iter().copied().fold(None, |max, tx| match max {
        Some(m) if tx.value_wei <= m.value_wei => Some(m),
        _ => Some(tx),
    })
}

/// Calendar month (0 = January) of the transaction in `tz`.
pub fn month_index<Tz: TimeZone>(tx: &Transaction, tz: &Tz) -> Result<u32, InsightError> {
    tz.timestamp_opt(tx.timestamp, 0)
        .single()
        .map(|dt| dt.month0())
        .ok_or(InsightError::InvalidTimestamp(tx.timestamp))
}

/// Month with the most transactions; on ties the lowest month index wins.
pub fn most_active_month<Tz: TimeZone>(
    window: &[&Transaction],
    tz: &Tz,
) -> Result<Option<MonthActivity>, InsightError> {
    let mut per_month = [0usize; 12];
    for tx in window {
        per_month[month_index(tx, tz)? as usize] += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    for (idx, &count) in per_month.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((idx, count)),
        }
    }

    Ok(best.and_then(|(idx, count)| {
        Month::try_from(idx as u8 + 1)
            .ok()
            .map(|month| MonthActivity { month, count })
    }))
}

/// Sum of `gasPrice * gasUsed` in wei
pub fn total_fees_wei(window: &[&Transaction]) -> Result<u128, InsightError> {
    window.iter().try_fold(0u128, |sum, tx| {
        tx.gas_price_wei
            .checked_mul(tx.gas_used)
            .and_then(|fee| sum.checked_add(fee))
            .ok_or(InsightError::Overflow)
    })
}

/// Distinct `to` values, compared verbatim (no case folding).
pub fn distinct_counterparts(window: &[&Transaction]) -> usize {
    window
        .iter()
        .map(|tx| tx.to.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn average_per_day(window: &[&Transaction]) -> Decimal {
    Decimal::from(window.len() as u64) / Decimal::from(DAYS_PER_YEAR)
}

/// Percentage of succeeded transactions, unrounded. `None` on an empty window.
pub fn success_rate(window: &[&Transaction]) -> Option<Decimal> {
    if window.is_empty() {
        return None;
    }
    let succeeded = window.iter().filter(|tx| tx.succeeded).count();
    Some(Decimal::from(succeeded as u64) * Decimal::ONE_HUNDRED / Decimal::from(window.len() as u64))
}

pub fn exceeds_success_threshold(rate: Decimal) -> bool {
    rate > Decimal::from(SUCCESS_RATE_THRESHOLD)
}

/// Running ETH balance: outgoing when `from` matches `address` ignoring case, incoming otherwise.
pub fn net_flow(window: &[&Transaction], address: &str) -> Result<Decimal, InsightError> {
    let me = address.to_lowercase();
    window.iter().try_fold(Decimal::ZERO, |net, tx| {
        let value = wei_to_eth(tx.value_wei)?;
        let next = if tx.from.to_lowercase() == me {
            net.checked_sub(value)
        } else {
            net.checked_add(value)
        };
        next.ok_or(InsightError::Overflow)
    })
}

/// Most frequent `to` value (verbatim match); on ties the first one seen wins.
pub fn favorite_counterpart<'a>(window: &[&'a Transaction]) -> Option<Counterpart<'a>> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<Counterpart<'a>> = Vec::new();

    for &tx in window {
        let address = tx.to.as_str();
        match slots.get(address) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(address, counts.len());
                counts.push(Counterpart { address, count: 1 });
            }
        }
    }

    counts.into_iter().fold(None, |best, c| match best {
        Some(b) if c.count <= b.count => Some(b),
        _ => Some(c),
    })
}

/// All nine statistics over one non-empty window
#[derive(Debug, Clone, PartialEq)]
pub struct WalletStats<'a> {
    pub transaction_count: usize,
    pub largest_transfer: &'a Transaction,
    pub most_active_month: MonthActivity,
    pub total_fees_wei: u128,
    pub distinct_counterparts: usize,
    pub average_per_day: Decimal,
    pub success_rate: Decimal,
    pub net_flow: Decimal,
    pub favorite_counterpart: Counterpart<'a>,
}

impl<'a> WalletStats<'a> {
    /// Fails with `EmptyWindow` rather than inventing values for the
    /// maximum, month, success rate and favorite counterpart.
    pub fn compute<Tz: TimeZone>(
        window: &[&'a Transaction],
        address: &str,
        tz: &Tz,
    ) -> Result<Self, InsightError> {
        let largest_transfer = largest_transfer(window).ok_or(InsightError::EmptyWindow)?;
        let most_active_month = most_active_month(window, tz)?.ok_or(InsightError::EmptyWindow)?;
        let success_rate = success_rate(window).ok_or(InsightError::EmptyWindow)?;
        let favorite_counterpart = favorite_counterpart(window).ok_or(InsightError::EmptyWindow)?;

        Ok(Self {
            transaction_count: transaction_count(window),
            largest_transfer,
            most_active_month,
            total_fees_wei: total_fees_wei(window)?,
            distinct_counterparts: distinct_counterparts(window),
            average_per_day: average_per_day(window),
            success_rate,
            net_flow: net_flow(window, address)?,
            favorite_counterpart,
        })
    }

    pub fn total_fees_eth(&self) -> Result<Decimal, InsightError> {
        wei_to_eth(self.total_fees_wei)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    const ME: &str = "0xMe00000000000000000000000000000000000001";
    const ETH: u128 = 1_000_000_000_000_000_000;
    // 2024-03-10T00:00:00Z
    const MARCH: i64 = 1_710_028_800;
    // 2024-07-10T00:00:00Z
    const JULY: i64 = 1_720_569_600;

    fn tx(from: &str, to: &str, value_wei: u128, timestamp: i64, succeeded: bool) -> Transaction {
        Transaction {
            hash: format!("{}-{}-{}", from, to, timestamp),
            block_number: None,
            timestamp,
            from: from.into(),
            to: to.into(),
            value_wei,
            gas_price_wei: 2,
            gas_used: 21_000,
            succeeded,
        }
    }

    fn refs(txs: &[Transaction]) -> Vec<&Transaction> {
        txs.iter().collect()
    }

    #[test]
    fn wei_converts_exactly() {
        assert_eq!(wei_to_eth(ETH).unwrap(), Decimal::ONE);
        assert_eq!(
            wei_to_eth(42_000).unwrap(),
            Decimal::from_str("0.000000000000042").unwrap()
        );
    }

    #[test]
    fn count_average_fees_and_net_flow_are_zero_on_empty_window() {
        let empty: Vec<&Transaction> = Vec::new();
        assert_eq!(transaction_count(&empty), 0);
        assert_eq!(total_fees_wei(&empty).unwrap(), 0);
        assert_eq!(distinct_counterparts(&empty), 0);
        assert_eq!(average_per_day(&empty), Decimal::ZERO);
        assert_eq!(net_flow(&empty, ME).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn undefined_statistics_are_none_on_empty_window() {
        let empty: Vec<&Transaction> = Vec::new();
        assert!(largest_transfer(&empty).is_none());
        assert!(most_active_month(&empty, &Utc).unwrap().is_none());
        assert!(success_rate(&empty).is_none());
        assert!(favorite_counterpart(&empty).is_none());
        assert_eq!(
            WalletStats::compute(&empty, ME, &Utc).unwrap_err(),
            InsightError::EmptyWindow
        );
    }

    #[test]
    fn largest_transfer_ties_go_to_first_in_window() {
        let txs = vec![
            tx(ME, "0xa", 5, MARCH, true),
            tx(ME, "0xb", 9, MARCH + 1, true),
            tx(ME, "0xc", 9, MARCH + 2, true),
        ];
        let window = refs(&txs);
        assert_eq!(largest_transfer(&window).unwrap().to, "0xb");
    }

    #[test]
    fn largest_transfer_compares_full_wei_precision() {
        // these differ only below f64 precision
        let txs = vec![
            tx(ME, "0xa", 100_000_000_000_000_000_000_001, MARCH, true),
            tx(ME, "0xb", 100_000_000_000_000_000_000_002, MARCH, true),
        ];
        assert_eq!(largest_transfer(&refs(&txs)).unwrap().to, "0xb");
    }

    #[test]
    fn most_active_month_counts_per_month() {
        let txs = vec![
            tx(ME, "0xa", 1, JULY, true),
            tx(ME, "0xa", 1, MARCH, true),
            tx(ME, "0xa", 1, JULY + 60, true),
        ];
        let best = most_active_month(&refs(&txs), &Utc).unwrap().unwrap();
        assert_eq!(best, MonthActivity { month: Month::July, count: 2 });
    }

    #[test]
    fn most_active_month_ties_go_to_lowest_month() {
        // July appears first in the window, but March has the lower index
        let txs = vec![tx(ME, "0xa", 1, JULY, true), tx(ME, "0xa", 1, MARCH, true)];
        let best = most_active_month(&refs(&txs), &Utc).unwrap().unwrap();
        assert_eq!(best.month, Month::March);
        assert_eq!(best.count, 1);
    }

    #[test]
    fn month_follows_reference_zone() {
        // 2024-03-31T23:30:00Z is already April at UTC+1
        let t = tx(ME, "0xa", 1, 1_711_927_800, true);
        let plus_one = chrono::FixedOffset::east_opt(3600).unwrap();
        assert_eq!(month_index(&t, &Utc).unwrap(), 2);
        assert_eq!(month_index(&t, &plus_one).unwrap(), 3);
    }

    #[test]
    fn fee_total_is_order_independent_sum() {
        let mut a = tx(ME, "0xa", 0, MARCH, true);
        a.gas_price_wei = 30_000_000_000;
        a.gas_used = 21_000;
        let mut b = tx(ME, "0xb", 0, MARCH, true);
        b.gas_price_wei = 7;
        b.gas_used = 100_000;
        let expected = 30_000_000_000u128 * 21_000 + 7 * 100_000;

        let forward = vec![a.clone(), b.clone()];
        let backward = vec![b, a];
        assert_eq!(total_fees_wei(&refs(&forward)).unwrap(), expected);
        assert_eq!(total_fees_wei(&refs(&backward)).unwrap(), expected);
    }

    #[test]
    fn fee_overflow_is_reported() {
        let mut a = tx(ME, "0xa", 0, MARCH, true);
        a.gas_price_wei = u128::MAX;
        a.gas_used = 2;
        assert_eq!(total_fees_wei(&refs(&[a])).unwrap_err(), InsightError::Overflow);
    }

    #[test]
    fn counterparts_are_case_sensitive() {
        let txs = vec![
            tx(ME, "0xABC", 1, MARCH, true),
            tx(ME, "0xabc", 1, MARCH, true),
            tx(ME, "0xabc", 1, MARCH, true),
        ];
        assert_eq!(distinct_counterparts(&refs(&txs)), 2);
    }

    #[test]
    fn average_uses_fixed_365_day_divisor() {
        let txs: Vec<Transaction> = (0..730).map(|i| tx(ME, "0xa", 1, MARCH + i, true)).collect();
        assert_eq!(average_per_day(&refs(&txs)), Decimal::from(2));
    }

    #[test]
    fn success_rate_rises_when_failures_are_substituted() {
        let mut txs: Vec<Transaction> = (0..4).map(|i| tx(ME, "0xa", 1, MARCH + i, false)).collect();
        let mut last = success_rate(&refs(&txs)).unwrap();
        assert_eq!(last, Decimal::ZERO);
        for i in 0..txs.len() {
            txs[i].succeeded = true;
            let rate = success_rate(&refs(&txs)).unwrap();
            assert!(rate >= last);
            last = rate;
        }
        assert_eq!(last, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn threshold_is_compared_on_unrounded_rate() {
        // 95.004 rounds to "95.00" but is still above 95
        let rate = Decimal::from_str("95.004").unwrap();
        assert!(exceeds_success_threshold(rate));
        assert!(!exceeds_success_threshold(Decimal::from(95)));
    }

    #[test]
    fn net_flow_direction_ignores_address_case() {
        let txs = vec![
            tx(&ME.to_uppercase(), "0xa", 2 * ETH, MARCH, true),
            tx("0xother", ME, 5 * ETH, MARCH, true),
        ];
        assert_eq!(net_flow(&refs(&txs), &ME.to_lowercase()).unwrap(), Decimal::from(3));
    }

    #[test]
    fn swapping_direction_flips_contribution_sign() {
        let base = vec![tx("0xother", ME, 4 * ETH, MARCH, true)];
        let outgoing = tx(ME, "0xother", ETH, MARCH, true);
        let incoming = tx("0xother", ME, ETH, MARCH, true);

        let before = net_flow(&refs(&base), ME).unwrap();
        let mut with_out = base.clone();
        with_out.push(outgoing);
        let mut with_in = base.clone();
        with_in.push(incoming);

        let out_delta = net_flow(&refs(&with_out), ME).unwrap() - before;
        let in_delta = net_flow(&refs(&with_in), ME).unwrap() - before;
        assert_eq!(out_delta, -in_delta);
        assert_eq!(in_delta, Decimal::ONE);
    }

    #[test]
    fn favorite_counterpart_ties_go_to_first_seen() {
        let txs = vec![
            tx(ME, "0xzzz", 1, MARCH, true),
            tx(ME, "0xaaa", 1, MARCH, true),
            tx(ME, "0xaaa", 1, MARCH, true),
            tx(ME, "0xzzz", 1, MARCH, true),
        ];
        let fav = favorite_counterpart(&refs(&txs)).unwrap();
        assert_eq!(fav, Counterpart { address: "0xzzz", count: 2 });
    }

    #[test]
    fn favorite_counterpart_picks_highest_count() {
        let txs = vec![
            tx(ME, "0xzzz", 1, MARCH, true),
            tx(ME, "0xaaa", 1, MARCH, true),
            tx(ME, "0xaaa", 1, MARCH, true),
        ];
        let fav = favorite_counterpart(&refs(&txs)).unwrap();
        assert_eq!(fav.address, "0xaaa");
        assert_eq!(fav.count, 2);
    }
}
