use std::future::Future;
use std::time::Duration;

use stocky_market_data::MarketDataError;

use crate::errors::{Error, Result};

/// Caller-supplied bounds for external calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadlines {
    /// Limit for a single price fetch
    pub fetch: Duration,
    /// Limit for a single storage unit of work
    pub storage: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(5_000),
            storage: Duration::from_millis(10_000),
        }
    }
}

/// Runs a storage future under `limit`. Dropping the future on expiry
/// cancels the unit of work, which the writer rolls back.
pub async fn with_storage_deadline<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::DeadlineExceeded(format!(
            "{} did not complete within {}ms",
            what,
            limit.as_millis()
        ))),
    }
}

/// Runs a price fetch under `limit`, reporting expiry as a source timeout.
pub async fn with_fetch_deadline<T, F>(limit: Duration, provider: &str, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, MarketDataError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => Err(Error::MarketData(MarketDataError::Timeout {
            provider: provider.to_string(),
        })),
    }
}
