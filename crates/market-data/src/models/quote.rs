use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price observation produced by a [`crate::PriceSource`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceQuote {
    /// Symbol the price applies to (canonical uppercase)
    pub symbol: String,

    /// Price in the ledger currency
    pub price: Decimal,

    /// Source tag (e.g. "mock-random")
    pub source: String,

    /// When the source produced the price
    pub timestamp: DateTime<Utc>,
}

impl SourceQuote {
    pub fn new(symbol: impl Into<String>, price: Decimal, source: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            source: source.into(),
            timestamp: Utc::now(),
        }
    }
}
