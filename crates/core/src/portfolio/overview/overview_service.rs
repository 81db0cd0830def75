use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::overview_model::{HistoricalValue, PortfolioPosition, SymbolTotal, UserStats};
use crate::positions::Position;
use crate::quotes::Quote;
use crate::errors::Result;
use crate::portfolio::holdings::HoldingsRepositoryTrait;
use crate::positions::PositionRepositoryTrait;
use crate::quotes::QuoteServiceTrait;
use crate::rewards::{RewardRepositoryTrait, TodayReward};
use crate::utils::decimal_utils::{position_value, round_amount, round_display};
use crate::utils::time_utils::utc_day_bounds;

/// Read-only views over rewards, positions, holdings and quotes.
///
/// An unknown user yields empty views, not an error.
#[async_trait]
pub trait OverviewServiceTrait: Send + Sync {
    /// Rewards with a reward time inside the current UTC day, oldest first.
    fn today_rewards(&self, user_id: &str) -> Result<Vec<TodayReward>>;

    /// Daily holdings strictly before today (UTC), oldest first.
    fn historical_inr(&self, user_id: &str) -> Result<Vec<HistoricalValue>>;

    async fn user_stats(&self, user_id: &str) -> Result<UserStats>;

    /// Positions with a resolvable quote. Unpriceable positions are omitted.
    async fn portfolio(&self, user_id: &str) -> Result<Vec<PortfolioPosition>>;
}

pub struct OverviewService {
    rewards: Arc<dyn RewardRepositoryTrait>,
    positions: Arc<dyn PositionRepositoryTrait>,
    holdings: Arc<dyn HoldingsRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl OverviewService {
    pub fn new(
        rewards: Arc<dyn RewardRepositoryTrait>,
        positions: Arc<dyn PositionRepositoryTrait>,
        holdings: Arc<dyn HoldingsRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            rewards,
            positions,
            holdings,
            quote_service,
        }
    }
}

#[async_trait]
impl OverviewServiceTrait for OverviewService {
    fn today_rewards(&self, user_id: &str) -> Result<Vec<TodayReward>> {
        let (start, end) = utc_day_bounds(Utc::now());
        let events = self.rewards.list_rewarded_between(user_id, start, end)?;
        Ok(events.iter().map(TodayReward::from).collect())
    }

    fn historical_inr(&self, user_id: &str) -> Result<Vec<HistoricalValue>> {
        let today = Utc::now().date_naive();
        let holdings = self.holdings.list_before(user_id, today)?;
        Ok(holdings.into_iter().map(HistoricalValue::from).collect())
    }

    async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let (start, end) = utc_day_bounds(Utc::now());
        let mut by_symbol: BTreeMap<String, Decimal> = BTreeMap::new();
        for event in self.rewards.list_rewarded_between(user_id, start, end)? {
            let total = by_symbol.entry(event.symbol).or_insert(Decimal::ZERO);
            match total.checked_add(event.shares) {
                Some(sum) => *total = sum,
                None => warn!("Share total for {} out of range; event {} skipped", user_id, event.id),
            }
        }
        let totals_today = by_symbol
            .into_iter()
            .map(|(symbol, shares)| SymbolTotal { symbol, shares })
            .collect();

        let positions = self.positions.list_for_user(user_id)?;
        let mut portfolio_value = Decimal::ZERO;
        let mut price_as_of = None;
        if !positions.is_empty() {
            let symbols: Vec<String> = positions.iter().map(|p| p.symbol.clone()).collect();
            let quotes = self.quote_service.quotes_for(&symbols).await?;
            for position in &positions {
                let Some(quote) = quotes.get(&position.symbol) else {
                    continue;
                };
                let Some(sum) = quote
                    .price_inr
                    .checked_mul(position.net_shares)
                    .and_then(|value| portfolio_value.checked_add(value))
                else {
                    warn!(
                        "Value of {} held by {} out of range; position skipped",
                        position.symbol, user_id
                    );
                    continue;
                };
                portfolio_value = sum;
                if price_as_of.map_or(true, |seen| quote.fetched_at > seen) {
                    price_as_of = Some(quote.fetched_at);
                }
            }
        }

        Ok(UserStats {
            totals_today,
            portfolio_inr: round_display(portfolio_value),
            price_as_of,
        })
    }

    async fn portfolio(&self, user_id: &str) -> Result<Vec<PortfolioPosition>> {
        let positions = self.positions.list_for_user(user_id)?;
        if positions.is_empty() {
            return Ok(Vec::new());
        }

        let symbols: Vec<String> = positions.iter().map(|p| p.symbol.clone()).collect();
        let quotes = self.quote_service.quotes_for(&symbols).await?;

        Ok(positions
            .into_iter()
            .filter_map(|position| {
                let quote = quotes.get(&position.symbol)?;
                let view = value_position(&position, quote);
                if view.is_none() {
                    warn!(
                        "Value of {} held by {} out of range; position omitted",
                        position.symbol, position.user_id
                    );
                }
                view
            })
            .collect())
    }
}

/// `None` when any amount overflows.
fn value_position(position: &Position, quote: &Quote) -> Option<PortfolioPosition> {
    let current_value = position_value(position.net_shares, quote.price_inr)?;
    let avg_cost = round_amount(position.avg_cost_inr);
    let cost_basis = position.net_shares.checked_mul(avg_cost)?;
    let unrealized = round_display(current_value.checked_sub(cost_basis)?);
    Some(PortfolioPosition {
        symbol: position.symbol.clone(),
        shares: position.net_shares,
        avg_acq_price_inr: avg_cost,
        current_price_inr: quote.price_inr,
        current_value_inr: current_value,
        unrealized_pnl_inr: unrealized,
        price_as_of: quote.fetched_at,
    })
}
