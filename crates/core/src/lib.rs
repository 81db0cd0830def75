//! Stocky Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the reward engine: fee
//! computation, the double-entry ledger, weighted-average positions, the
//! quote pipeline, and the daily valuation cycle. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod positions;
pub mod quotes;
pub mod rewards;
pub mod stocks;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export common types
pub use portfolio::*;
pub use positions::{Position, PositionRepositoryTrait};
pub use quotes::{Quote, QuoteService, QuoteServiceTrait, QuoteStore};
pub use rewards::*;
pub use stocks::{Stock, StockRepositoryTrait, StockStatus};
pub use utils::deadline_utils::Deadlines;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
