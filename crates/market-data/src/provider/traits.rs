//! Price source trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::SourceQuote;

/// Trait for anything that can quote a symbol.
///
/// Implement this trait to plug a new market data origin into the quote
/// pipeline. The symbol handed in is already canonical (uppercase).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stocky_market_data::{MarketDataError, PriceSource, SourceQuote};
///
/// struct FixedSource;
///
/// #[async_trait]
/// impl PriceSource for FixedSource {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_quote(&self, symbol: &str) -> Result<SourceQuote, MarketDataError> {
///         Ok(SourceQuote::new(symbol, dec!(100), self.id()))
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source tag recorded alongside every persisted quote.
    fn id(&self) -> &'static str;

    /// Fetch the current price for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError` if the symbol is unknown or the source fails.
    async fn fetch_quote(&self, symbol: &str) -> Result<SourceQuote, MarketDataError>;
}
