use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger::LedgerEntry;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::decimal_utils::{amount_out_of_range, apply_bps, round_amount};

/// Latest calendar year a reward time may carry; stored timestamps are
/// fixed-width text compared lexically.
pub const MAX_REWARD_YEAR: i32 = 9999;

/// Incoming reward request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReward {
    pub user_id: String,
    pub symbol: String,
    pub shares: Decimal,
    /// Caller-supplied idempotency key
    #[serde(rename = "eventId")]
    pub event_key: String,
    #[serde(default)]
    pub rewarded_at: Option<DateTime<Utc>>,
}

impl NewReward {
    /// Rejects missing identifiers, non-positive share counts and reward
    /// times outside years 0..=9999.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(missing("userId"));
        }
        if self.symbol.trim().is_empty() {
            return Err(missing("symbol"));
        }
        if self.event_key.trim().is_empty() {
            return Err(missing("eventId"));
        }
        if self.shares <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "shares must be greater than zero".to_string(),
            )));
        }
        if let Some(at) = self.rewarded_at {
            if !(0..=MAX_REWARD_YEAR).contains(&at.year()) {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "rewardedAt year {} is outside 0..={}",
                    at.year(),
                    MAX_REWARD_YEAR
                ))));
            }
        }
        Ok(())
    }
}

fn missing(field: &str) -> Error {
    Error::Validation(ValidationError::MissingField(field.to_string()))
}

/// Brokerage and tax rates in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub brokerage_bps: Decimal,
    pub tax_bps: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage_bps: Decimal::from(40),
            tax_bps: Decimal::from(35),
        }
    }
}

/// Amounts charged for one reward, each rounded to 4 places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardCharges {
    pub cost: Decimal,
    pub brokerage: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl FeeSchedule {
    /// Fails with `ValidationError::AmountOutOfRange` when any amount
    /// overflows.
    pub fn charges(&self, price: Decimal, shares: Decimal) -> Result<RewardCharges> {
        let cost = price
            .checked_mul(shares)
            .map(round_amount)
            .ok_or_else(|| amount_out_of_range("reward cost"))?;
        let brokerage =
            apply_bps(cost, self.brokerage_bps).ok_or_else(|| amount_out_of_range("brokerage"))?;
        let taxes = apply_bps(cost, self.tax_bps).ok_or_else(|| amount_out_of_range("taxes"))?;
        let total = cost
            .checked_add(brokerage)
            .and_then(|sum| sum.checked_add(taxes))
            .ok_or_else(|| amount_out_of_range("total cash-out"))?;
        Ok(RewardCharges {
            cost,
            brokerage,
            taxes,
            total,
        })
    }
}

/// Immutable record of a granted reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEvent {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub shares: Decimal,
    pub granted_price: Decimal,
    pub brokerage_inr: Decimal,
    pub taxes_inr: Decimal,
    pub total_cash_out_inr: Decimal,
    pub rewarded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_key: String,
}

/// A reward event together with its ledger postings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardDetail {
    #[serde(flatten)]
    pub event: RewardEvent,
    pub ledger: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayReward {
    pub symbol: String,
    pub shares: Decimal,
    pub rewarded_at: DateTime<Utc>,
}

impl From<&RewardEvent> for TodayReward {
    fn from(event: &RewardEvent) -> Self {
        Self {
            symbol: event.symbol.clone(),
            shares: event.shares,
            rewarded_at: event.rewarded_at,
        }
    }
}
