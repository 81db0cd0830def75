//! Quote storage trait.
//!
//! Abstracts the latest-quote table and the append-only price history so the
//! quote service can be exercised against any backend.

use async_trait::async_trait;
use std::collections::HashMap;

use super::model::Quote;
use crate::errors::Result;

/// Storage interface for quote data.
///
/// Mutations are async and go through the storage writer; reads are sync.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Inserts or replaces the latest quote for `quote.symbol`.
    async fn upsert_latest(&self, quote: &Quote) -> Result<()>;

    /// Appends one history row keyed by `(symbol, fetched_at)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UniqueViolation` when a row for the same
    /// symbol and instant already exists.
    async fn append_history(&self, quote: &Quote) -> Result<()>;

    /// Returns the cached latest quote, if any.
    fn get_latest(&self, symbol: &str) -> Result<Option<Quote>>;

    /// Returns the cached latest quotes for the given symbols.
    ///
    /// Symbols without a cached quote are absent from the map.
    fn get_latest_many(&self, symbols: &[String]) -> Result<HashMap<String, Quote>>;

    /// Returns the history for a symbol, oldest first.
    fn list_history(&self, symbol: &str) -> Result<Vec<Quote>>;
}
