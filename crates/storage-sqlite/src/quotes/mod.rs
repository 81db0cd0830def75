//! SQLite storage for latest quotes and the price history.

mod model;
mod repository;

pub use model::{PriceHistoryDB, QuoteDB};
pub use repository::QuoteRepository;
