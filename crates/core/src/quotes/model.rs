//! Quote domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stocky_market_data::SourceQuote;

/// Latest known price for a symbol.
///
/// One row per symbol in the latest-quote table; every persisted quote is
/// also appended to the price history with `fetched_at` as its `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price_inr: Decimal,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<SourceQuote> for Quote {
    fn from(quote: SourceQuote) -> Self {
        Self {
            symbol: quote.symbol,
            price_inr: quote.price,
            source: quote.source,
            fetched_at: quote.timestamp,
        }
    }
}
