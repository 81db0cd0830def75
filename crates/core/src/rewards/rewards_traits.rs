//! Reward repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::ledger::LedgerEntry;
use super::rewards_model::{NewReward, RewardDetail, RewardEvent};
use crate::errors::Result;
use crate::positions::Position;

/// Persistence contract for the reward unit of work.
#[async_trait]
pub trait RewardRepositoryTrait: Send + Sync {
    /// Records a reward atomically.
    ///
    /// Within one transaction the implementation must:
    /// 1. Create the user if absent.
    /// 2. Create the stock if absent (see [`crate::stocks::Stock::provisioned`]).
    /// 3. Fail with `RewardError::DuplicateEvent` if `event.event_key` exists.
    /// 4. Insert the event and its postings.
    /// 5. Apply the reward to the (user, symbol) position under an exclusive
    ///    write lock, via [`Position::apply_reward`].
    ///
    /// Any failure, including the caller abandoning the call, rolls back
    /// every step. Returns the updated position.
    async fn record_reward(
        &self,
        event: RewardEvent,
        postings: Vec<LedgerEntry>,
    ) -> Result<Position>;

    fn get_by_id(&self, event_id: &str) -> Result<Option<RewardEvent>>;

    fn get_by_event_key(&self, event_key: &str) -> Result<Option<RewardEvent>>;

    fn list_ledger_entries(&self, event_id: &str) -> Result<Vec<LedgerEntry>>;

    /// Events of a user with `start <= rewarded_at < end`, oldest first.
    fn list_rewarded_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RewardEvent>>;
}

#[async_trait]
pub trait RewardServiceTrait: Send + Sync {
    /// Prices, charges and records a reward.
    async fn create_reward(&self, new_reward: NewReward) -> Result<RewardEvent>;

    /// Returns the event and its postings, or `DatabaseError::NotFound`.
    fn get_reward(&self, event_id: &str) -> Result<RewardDetail>;
}
