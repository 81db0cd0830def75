use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::holdings::DailyHolding;

/// Shares rewarded today for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTotal {
    pub symbol: String,
    pub shares: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub totals_today: Vec<SymbolTotal>,
    pub portfolio_inr: Decimal,
    /// Most recent quote timestamp among held symbols
    pub price_as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPosition {
    pub symbol: String,
    pub shares: Decimal,
    pub avg_acq_price_inr: Decimal,
    pub current_price_inr: Decimal,
    pub current_value_inr: Decimal,
    pub unrealized_pnl_inr: Decimal,
    pub price_as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalValue {
    pub date: NaiveDate,
    pub total_inr: Decimal,
}

impl From<DailyHolding> for HistoricalValue {
    fn from(holding: DailyHolding) -> Self {
        Self {
            date: holding.date,
            total_inr: holding.total_value_inr,
        }
    }
}
