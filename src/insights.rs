// src/insights.rs
use chrono::{DateTime, Datelike, Month, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::aggregator::{self, WalletStats};
use crate::error::InsightError;
use crate::models::{Insight, InsightKind, Transaction};
use crate::window;

/// Derive the ten slides for `address` over the trailing calendar year of `reference`.
pub fn compute_insights<Tz: TimeZone>(
    transactions: &[Transaction],
    address: &str,
    reference: &DateTime<Tz>,
) -> Result<Vec<Insight>, InsightError> {
    compute_insights_for_year(transactions, address, &reference.timezone(), reference.year())
}

pub fn compute_insights_for_year<Tz: TimeZone>(
    transactions: &[Transaction],
    address: &str,
    tz: &Tz,
    reference_year: i32,
) -> Result<Vec<Insight>, InsightError> {
    let lower_bound = window::window_start(tz, reference_year)?;
    let year_window = window::filter_window(transactions, lower_bound);
    debug!(
        "Window from {} keeps {} of {} transactions",
        lower_bound,
        year_window.len(),
        transactions.len()
    );

    let stats = WalletStats::compute(&year_window, address, tz)?;
    render(&stats)
}

/// Render already computed statistics in slide order
pub fn render(stats: &WalletStats<'_>) -> Result<Vec<Insight>, InsightError> {
    let largest = aggregator::wei_to_eth(stats.largest_transfer.value_wei)?;
    let fees = stats.total_fees_eth()?;

    let texts = [
        transaction_count_text(stats.transaction_count),
        largest_transfer_text(largest),
        most_active_month_text(stats.most_active_month.month, stats.most_active_month.count),
        total_fees_text(fees),
        distinct_counterparts_text(stats.distinct_counterparts),
        average_per_day_text(stats.average_per_day),
        success_rate_text(stats.success_rate),
        net_flow_text(stats.net_flow),
        favorite_counterpart_text(
            stats.favorite_counterpart.address,
            stats.favorite_counterpart.count,
        ),
        summary_text(
            stats.transaction_count,
            fees,
            stats.distinct_counterparts,
            stats.net_flow,
            stats.most_active_month.month,
        ),
    ];

    Ok(InsightKind::ORDER
        .into_iter()
        .zip(texts)
        .map(|(kind, text)| Insight::new(kind, text))
        .collect())
}

fn fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", places as usize, rounded)
}

/// `0x1234567890abcdef` -> `0x1234...cdef`
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn transaction_count_text(count: usize) -> String {
    format!(
        "You made a total of {} transactions in the past year. What a journey!",
        count
    )
}

pub fn largest_transfer_text(eth: Decimal) -> String {
    format!("Your biggest transaction was {} ETH. Whale alert! 🐳", eth.normalize())
}

pub fn most_active_month_text(month: Month, count: usize) -> String {
    format!(
        "You were on fire 🔥 in {} with {} transactions!",
        month.name(),
        count
    )
}

pub fn total_fees_text(eth: Decimal) -> String {
    format!("You spent a whopping {} ETH on gas fees. Ouch! 💸", fixed(eth, 4))
}

pub fn distinct_counterparts_text(count: usize) -> String {
    format!(
        "You interacted with {} unique smart contracts. Diversification at its finest! 🌈",
        count
    )
}

pub fn average_per_day_text(average: Decimal) -> String {
    format!(
        "On average, you made {} transactions per day. Crypto never sleeps! 😴",
        fixed(average, 2)
    )
}

pub fn success_rate_text(rate: Decimal) -> String {
    let verdict = if aggregator::exceeds_success_threshold(rate) {
        "Nailed it! 🎯"
    } else {
        "Room for improvement! 🎓"
    };
    format!("Your transaction success rate was {}%. {}", fixed(rate, 2), verdict)
}

pub fn net_flow_text(net: Decimal) -> String {
    let verdict = if net > Decimal::ZERO {
        "You're in the green! 💚"
    } else {
        "Keep HODLing! 💎🙌"
    };
    format!("Your net ETH flow for the year: {} ETH. {}", fixed(net, 4), verdict)
}

pub fn favorite_counterpart_text(address: &str, count: usize) -> String {
    format!(
        "Your favorite address was {}. You interacted with it {} times! 💕",
        truncate_address(address),
        count
    )
}

pub fn summary_text(
    count: usize,
    fees: Decimal,
    counterparts: usize,
    net: Decimal,
    month: Month,
) -> String {
    format!(
        "In summary, your crypto year was a rollercoaster! You made {} transactions, spent {} ETH on gas, \
         and interacted with {} different contracts. Your net ETH flow was {} ETH, and you were most active in {}. \
         Keep on crypto-ing! 🚀",
        count,
        fixed(fees, 4),
        counterparts,
        fixed(net, 4),
        month.name()
    )
}
