// src/models.rs
use serde::{Deserialize, Serialize};

/// A transaction exactly as the explorer returns it (every field is text)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub hash: String,

    #[serde(rename = "blockNumber", default)]
    pub block_number: String,

    #[serde(rename = "timeStamp", alias = "timestamp", default)]
    pub timestamp: String,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: String,

    #[serde(default)]
    pub value: String,

    #[serde(rename = "gasPrice", default)]
    pub gas_price: String,

    #[serde(rename = "gasUsed", default)]
    pub gas_used: String,

    #[serde(rename = "isError", default)]
    pub is_error: String,
}

/// Strictly typed transaction, coerced once at ingestion (see `parser`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: String,
    pub block_number: Option<u64>,
    pub timestamp: i64,     // seconds since epoch
    pub from: String,
    pub to: String,         // empty for contract creation
    pub value_wei: u128,
    pub gas_price_wei: u128,
    pub gas_used: u128,
    pub succeeded: bool,    // isError == "0"
}

/// Which statistic an insight reports; fixes the slide order and its artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    TransactionCount,
    LargestTransfer,
    MostActiveMonth,
    TotalFees,
    DistinctCounterparts,
    AveragePerDay,
    SuccessRate,
    NetFlow,
    FavoriteCounterpart,
    Summary,
}

impl InsightKind {
    pub const ORDER: [InsightKind; 10] = [
        InsightKind::TransactionCount,
        InsightKind::LargestTransfer,
        InsightKind::MostActiveMonth,
        InsightKind::TotalFees,
        InsightKind::DistinctCounterparts,
        InsightKind::AveragePerDay,
        InsightKind::SuccessRate,
        InsightKind::NetFlow,
        InsightKind::FavoriteCounterpart,
        InsightKind::Summary,
    ];

    /// Decorative artwork shown next to the slide
    pub fn image(self) -> &'static str {
        match self {
            InsightKind::TransactionCount => "/images/journey.png",
            InsightKind::LargestTransfer => "/images/whale.png",
            InsightKind::MostActiveMonth => "/images/fire.png",
            InsightKind::TotalFees => "/images/gas.png",
            InsightKind::DistinctCounterparts => "/images/rainbow.png",
            InsightKind::AveragePerDay => "/images/sleepless.png",
            InsightKind::SuccessRate => "/images/target.png",
            InsightKind::NetFlow => "/images/diamond-hands.png",
            InsightKind::FavoriteCounterpart => "/images/heart.png",
            InsightKind::Summary => "/images/rocket.png",
        }
    }
}

/// One rendered slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
    pub image: String,
}

impl Insight {
    pub fn new(kind: InsightKind, text: String) -> Self {
        Self {
            kind,
            text,
            image: kind.image().to_string(),
        }
    }
}

/// Envelope of the explorer's `txlist` response
#[derive(Debug, Deserialize)]
pub struct TxListResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub result: serde_json::Value,
}
