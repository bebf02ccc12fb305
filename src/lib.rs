pub mod aggregator;
pub mod api;
pub mod cli;
pub mod config;
pub mod deck;
pub mod error;
pub mod etherscan;
pub mod insights;
pub mod models;
pub mod parser;
pub mod window;
pub mod wrapped;

pub use error::{FetchError, InsightError, ParseError, WrappedError};
pub use insights::compute_insights;
pub use models::{Insight, InsightKind, RawTransaction, Transaction};
