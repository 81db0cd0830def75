//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching a price from a source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The requested symbol is unknown to the source.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The source did not answer within the caller's deadline.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The source that timed out
        provider: String,
    },

    /// A source-specific failure.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The source that returned the error
        provider: String,
        /// The error message from the source
        message: String,
    },

    /// The source returned a price that cannot be used (zero, negative, malformed).
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// The source was configured with unusable parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
