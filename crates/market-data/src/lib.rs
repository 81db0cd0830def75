//! Stocky Market Data Crate
//!
//! This crate provides the price-source abstraction used by the reward engine
//! to obtain grant prices and by the valuation job to revalue positions.
//!
//! # Overview
//!
//! - [`PriceSource`] - Capability boundary for anything that can quote a symbol
//! - [`RandomPriceSource`] - Seedable stand-in market that clusters each symbol
//!   around a symbol-specific baseline
//! - [`SourceQuote`] - A single price observation returned by a source
//! - [`MarketDataError`] - Errors raised by sources
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   QuoteService   | --> |   PriceSource    |  (injected capability)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   SourceQuote    |  (price + source tag)
//!                          +------------------+
//! ```
//!
//! Swapping the random source for a real market-data adapter only requires a
//! new [`PriceSource`] implementation.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::SourceQuote;
pub use provider::random::{RandomPriceSource, RandomSourceConfig, RANDOM_SOURCE_ID};
pub use provider::PriceSource;
