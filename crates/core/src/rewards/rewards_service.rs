use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::ledger::{build_postings, posting_totals};
use super::rewards_errors::RewardError;
use super::rewards_model::{FeeSchedule, NewReward, RewardDetail, RewardEvent};
use super::rewards_traits::{RewardRepositoryTrait, RewardServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::quotes::QuoteServiceTrait;
use crate::stocks::normalize_symbol;
use crate::utils::deadline_utils::{with_storage_deadline, Deadlines};
use crate::utils::decimal_utils::amount_out_of_range;

pub struct RewardService {
    repository: Arc<dyn RewardRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    fees: FeeSchedule,
    deadlines: Deadlines,
}

impl RewardService {
    pub fn new(
        repository: Arc<dyn RewardRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
        fees: FeeSchedule,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            repository,
            quote_service,
            fees,
            deadlines,
        }
    }
}

#[async_trait]
impl RewardServiceTrait for RewardService {
    async fn create_reward(&self, new_reward: NewReward) -> Result<RewardEvent> {
        new_reward.validate()?;
        let symbol = normalize_symbol(&new_reward.symbol)?;
        let user_id = new_reward.user_id.trim().to_string();
        let event_key = new_reward.event_key.trim().to_string();

        let quote = self.quote_service.ensure_quote(&symbol).await?;
        let charges = self.fees.charges(quote.price_inr, new_reward.shares)?;
        debug!(
            "Pricing reward {}: {} x {} at {} (cost {}, brokerage {}, taxes {})",
            event_key,
            new_reward.shares,
            symbol,
            quote.price_inr,
            charges.cost,
            charges.brokerage,
            charges.taxes
        );

        // Timestamps are stored at microsecond precision.
        let now = Utc::now().trunc_subsecs(6);
        let event = RewardEvent {
            id: Uuid::new_v4().to_string(),
            user_id,
            symbol,
            shares: new_reward.shares,
            granted_price: quote.price_inr,
            brokerage_inr: charges.brokerage,
            taxes_inr: charges.taxes,
            total_cash_out_inr: charges.total,
            rewarded_at: new_reward
                .rewarded_at
                .map_or(now, |at| at.trunc_subsecs(6)),
            created_at: now,
            event_key,
        };

        let postings = build_postings(&event)?;
        match posting_totals(&postings) {
            Some((debits, credits)) if debits == credits => {}
            Some((debits, credits)) => {
                return Err(Error::Reward(RewardError::UnbalancedPostings {
                    event_key: event.event_key.clone(),
                    debits,
                    credits,
                }));
            }
            None => return Err(amount_out_of_range("ledger postings")),
        }

        let position = with_storage_deadline(
            self.deadlines.storage,
            "reward unit of work",
            self.repository.record_reward(event.clone(), postings),
        )
        .await
        .map_err(|e| {
            if let Error::Reward(RewardError::DuplicateEvent(key)) = &e {
                warn!("Rejected duplicate reward event {}", key);
            }
            e
        })?;

        info!(
            "Recorded reward {} for user {}: {} {} (position now {} @ {})",
            event.event_key,
            event.user_id,
            event.shares,
            event.symbol,
            position.net_shares,
            position.avg_cost_inr
        );
        Ok(event)
    }

    fn get_reward(&self, event_id: &str) -> Result<RewardDetail> {
        let event = self.repository.get_by_id(event_id)?.ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!(
                "reward event {}",
                event_id
            )))
        })?;
        let ledger = self.repository.list_ledger_entries(&event.id)?;
        Ok(RewardDetail { event, ledger })
    }
}
