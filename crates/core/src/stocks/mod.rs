//! Stocks module - the symbol master and its tracking status.

mod stocks_model;
mod stocks_traits;

pub use stocks_model::{normalize_symbol, Stock, StockStatus, STOCK_STATUS_ACTIVE, STOCK_STATUS_INACTIVE};
pub use stocks_traits::StockRepositoryTrait;
