use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::decimal_utils::{amount_out_of_range, div_or_zero};

/// Holdings of one symbol by one user.
///
/// `avg_cost_inr` is kept at full precision; views round it for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub user_id: String,
    pub symbol: String,
    pub net_shares: Decimal,
    pub avg_cost_inr: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    pub fn empty(user_id: &str, symbol: &str, at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            net_shares: Decimal::ZERO,
            avg_cost_inr: Decimal::ZERO,
            updated_at: at,
        }
    }

    /// Position after adding `shares` acquired at `price`.
    ///
    /// `new_avg = (old_avg * old_shares + price * shares) / new_shares`,
    /// or zero when the resulting share total is zero. Fails with
    /// `ValidationError::AmountOutOfRange` when any step overflows.
    pub fn apply_reward(&self, shares: Decimal, price: Decimal, at: DateTime<Utc>) -> Result<Self> {
        let overflow =
            || amount_out_of_range(&format!("position {}/{}", self.user_id, self.symbol));
        let net_shares = self.net_shares.checked_add(shares).ok_or_else(overflow)?;
        let held_cost = self
            .avg_cost_inr
            .checked_mul(self.net_shares)
            .ok_or_else(overflow)?;
        let total_cost = price
            .checked_mul(shares)
            .and_then(|added| held_cost.checked_add(added))
            .ok_or_else(overflow)?;
        let avg_cost_inr = div_or_zero(total_cost, net_shares).ok_or_else(overflow)?;
        Ok(Self {
            user_id: self.user_id.clone(),
            symbol: self.symbol.clone(),
            net_shares,
            avg_cost_inr,
            updated_at: at,
        })
    }
}
