use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::positions::Position;
use crate::quotes::Quote;
use crate::utils::decimal_utils::position_value;

/// Per-user totals for one valuation pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserValuations {
    pub totals: BTreeMap<String, Decimal>,
    pub unpriced: Vec<(String, String)>,
}

/// Values each position as `round2(shares * price)` and sums per user.
///
/// Positions whose symbol has no quote, or whose value would overflow the
/// user's total, are listed in `unpriced` and do not contribute. A user with
/// only unpriced positions does not appear in `totals`.
pub fn value_by_user(positions: &[Position], quotes: &HashMap<String, Quote>) -> UserValuations {
    let mut valuations = UserValuations::default();
    for position in positions {
        let Some(quote) = quotes.get(&position.symbol) else {
            valuations
                .unpriced
                .push((position.user_id.clone(), position.symbol.clone()));
            continue;
        };
        let running = valuations
            .totals
            .get(&position.user_id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        match position_value(position.net_shares, quote.price_inr)
            .and_then(|value| running.checked_add(value))
        {
            Some(total) => {
                valuations.totals.insert(position.user_id.clone(), total);
            }
            None => {
                warn!(
                    "Value of {} held by {} out of range; position skipped",
                    position.symbol, position.user_id
                );
                valuations
                    .unpriced
                    .push((position.user_id.clone(), position.symbol.clone()));
            }
        }
    }
    valuations
}
