use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::model::Quote;
use super::store::QuoteStore;
use crate::errors::{DatabaseError, Error, Result};
use crate::stocks::{normalize_symbol, StockRepositoryTrait};
use crate::utils::deadline_utils::{with_fetch_deadline, with_storage_deadline, Deadlines};
use stocky_market_data::{MarketDataError, PriceSource};

/// Quote pipeline operations.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Returns the cached quote for `symbol`, fetching and persisting one
    /// when the cache has none.
    async fn ensure_quote(&self, symbol: &str) -> Result<Quote>;

    /// Fetches and persists a fresh quote for every ACTIVE symbol.
    ///
    /// Stops at the first failure; a failed refresh yields no result.
    async fn refresh_all(&self) -> Result<Vec<Quote>>;

    /// Batch read with fetch-on-miss. The map covers exactly the input set.
    async fn quotes_for(&self, symbols: &[String]) -> Result<HashMap<String, Quote>>;

    /// Cached read only. Never fetches.
    fn latest(&self, symbol: &str) -> Result<Option<Quote>>;
}

pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    stocks: Arc<dyn StockRepositoryTrait>,
    source: Option<Arc<dyn PriceSource>>,
    deadlines: Deadlines,
}

impl QuoteService {
    pub fn new(
        store: Arc<dyn QuoteStore>,
        stocks: Arc<dyn StockRepositoryTrait>,
        source: Option<Arc<dyn PriceSource>>,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            store,
            stocks,
            source,
            deadlines,
        }
    }

    async fn fetch_and_persist(&self, symbol: &str) -> Result<Quote> {
        let source = self.source.as_ref().ok_or_else(|| {
            Error::MarketData(MarketDataError::InvalidConfig(
                "no price source configured".to_string(),
            ))
        })?;

        let fetched =
            with_fetch_deadline(self.deadlines.fetch, source.id(), source.fetch_quote(symbol))
                .await?;
        if fetched.price <= Decimal::ZERO {
            return Err(Error::MarketData(MarketDataError::ValidationFailed {
                message: format!(
                    "{} returned non-positive price {} for {}",
                    source.id(),
                    fetched.price,
                    symbol
                ),
            }));
        }

        let mut quote = Quote::from(fetched);
        quote.symbol = symbol.to_string();
        self.persist(&quote).await?;
        Ok(quote)
    }

    /// Upserts the latest row, then appends history. A history row that
    /// already exists for the same instant is ignored.
    async fn persist(&self, quote: &Quote) -> Result<()> {
        with_storage_deadline(
            self.deadlines.storage,
            "latest quote upsert",
            self.store.upsert_latest(quote),
        )
        .await?;

        match with_storage_deadline(
            self.deadlines.storage,
            "price history append",
            self.store.append_history(quote),
        )
        .await
        {
            Ok(()) => Ok(()),
            Err(Error::Database(DatabaseError::UniqueViolation(detail))) => {
                debug!(
                    "Ignoring duplicate price history row for {} at {}: {}",
                    quote.symbol, quote.fetched_at, detail
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn ensure_quote(&self, symbol: &str) -> Result<Quote> {
        let symbol = normalize_symbol(symbol)?;
        if let Some(cached) = self.store.get_latest(&symbol)? {
            return Ok(cached);
        }
        debug!("No cached quote for {}, fetching", symbol);
        self.fetch_and_persist(&symbol).await
    }

    async fn refresh_all(&self) -> Result<Vec<Quote>> {
        let symbols = self.stocks.list_active_symbols()?;
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let mut refreshed = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            refreshed.push(self.fetch_and_persist(symbol).await?);
        }
        info!("Refreshed {} quotes", refreshed.len());
        Ok(refreshed)
    }

    async fn quotes_for(&self, symbols: &[String]) -> Result<HashMap<String, Quote>> {
        let wanted: BTreeSet<String> = symbols.iter().cloned().collect();
        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let wanted: Vec<String> = wanted.into_iter().collect();
        let mut quotes = self.store.get_latest_many(&wanted)?;
        quotes.retain(|symbol, _| wanted.contains(symbol));

        let misses: Vec<&String> = wanted.iter().filter(|s| !quotes.contains_key(*s)).collect();
        if !misses.is_empty() {
            debug!("Fetching {} uncached quotes", misses.len());
            let fetched =
                try_join_all(misses.into_iter().map(|symbol| self.fetch_and_persist(symbol)))
                    .await?;
            for quote in fetched {
                quotes.insert(quote.symbol.clone(), quote);
            }
        }

        Ok(quotes)
    }

    fn latest(&self, symbol: &str) -> Result<Option<Quote>> {
        let symbol = normalize_symbol(symbol)?;
        self.store.get_latest(&symbol)
    }
}
