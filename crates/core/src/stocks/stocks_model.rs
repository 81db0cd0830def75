use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EXCHANGE;
use crate::errors::{Error, Result, ValidationError};

pub const STOCK_STATUS_ACTIVE: &str = "ACTIVE";
pub const STOCK_STATUS_INACTIVE: &str = "INACTIVE";

/// Whether a symbol is tracked by the periodic refresh and valuation.
///
/// Inactive symbols still price on demand; they only drop out of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    #[default]
    Active,
    Inactive,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Active => STOCK_STATUS_ACTIVE,
            StockStatus::Inactive => STOCK_STATUS_INACTIVE,
        }
    }
}

impl From<&str> for StockStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            STOCK_STATUS_INACTIVE => StockStatus::Inactive,
            _ => StockStatus::Active,
        }
    }
}

/// Symbol master record, created lazily on the first reward that names it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub status: StockStatus,
    pub created_at: DateTime<Utc>,
}

impl Stock {
    /// Default record provisioned for a previously unseen symbol.
    pub fn provisioned(symbol: &str, at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            exchange: DEFAULT_EXCHANGE.to_string(),
            status: StockStatus::Active,
            created_at: at,
        }
    }
}

/// Canonical (trimmed, uppercase) form of a symbol.
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let canonical = symbol.trim().to_uppercase();
    if canonical.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "symbol".to_string(),
        )));
    }
    Ok(canonical)
}
