//! Quote management module.
//!
//! - [`model`] - The latest-price record per symbol
//! - [`store`] - Storage trait for latest quotes and the append-only history
//! - [`service`] - Fetch-on-miss reads, batch refresh, and persistence rules
//!
//! # Architecture
//!
//! ```text
//! QuoteService → PriceSource (market-data crate)
//!       ↓
//! QuoteStore (DB): price_quotes (upsert by symbol) + price_history (append)
//! ```

pub mod model;
pub mod service;
pub mod store;


pub use model::Quote;
pub use service::{QuoteService, QuoteServiceTrait};
pub use store::QuoteStore;
