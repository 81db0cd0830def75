use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewardError {
    /// The idempotency key was already recorded.
    #[error("Reward event '{0}' was already recorded")]
    DuplicateEvent(String),

    #[error("Ledger postings for '{event_key}' do not balance: debits {debits}, credits {credits}")]
    UnbalancedPostings {
        event_key: String,
        debits: Decimal,
        credits: Decimal,
    },
}
