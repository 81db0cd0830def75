use async_trait::async_trait;

use super::stocks_model::{Stock, StockStatus};
use crate::errors::Result;

/// Contract for the symbol master store.
///
/// Stocks are created inside the reward unit of work, so there is no
/// standalone create here.
#[async_trait]
pub trait StockRepositoryTrait: Send + Sync {
    /// Symbols whose status is ACTIVE, sorted.
    fn list_active_symbols(&self) -> Result<Vec<String>>;

    /// Retrieves a stock by symbol.
    fn get(&self, symbol: &str) -> Result<Option<Stock>>;

    /// Changes the tracking status of an existing stock.
    ///
    /// Returns `DatabaseError::NotFound` if the symbol was never provisioned.
    async fn set_status(&self, symbol: &str, status: StockStatus) -> Result<Stock>;
}
