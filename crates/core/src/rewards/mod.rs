//! Rewards module - reward events, their ledger postings, and the unit of
//! work that records both together with the position update.

mod ledger;
mod rewards_errors;
mod rewards_model;
mod rewards_service;
mod rewards_traits;


pub use ledger::{build_postings, is_balanced, posting_totals, AccountType, LedgerEntry};
pub use rewards_errors::RewardError;
pub use rewards_model::{FeeSchedule, NewReward, RewardCharges, RewardDetail, RewardEvent, TodayReward};
pub use rewards_service::RewardService;
pub use rewards_traits::{RewardRepositoryTrait, RewardServiceTrait};
