//! In-memory doubles for the repository and price-source traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stocky_market_data::{MarketDataError, PriceSource, SourceQuote};

use crate::errors::{DatabaseError, Error, Result};
use crate::portfolio::holdings::{DailyHolding, HoldingsRepositoryTrait};
use crate::positions::{Position, PositionRepositoryTrait};
use crate::quotes::{Quote, QuoteStore};
use crate::rewards::{LedgerEntry, RewardError, RewardEvent, RewardRepositoryTrait};
use crate::stocks::{Stock, StockRepositoryTrait, StockStatus};

// =========================================================================
// Price source
// =========================================================================

/// Returns prices from a fixed script, then repeats `fallback`.
#[derive(Default)]
pub struct ScriptedPriceSource {
    script: Mutex<VecDeque<Decimal>>,
    fallback: Option<Decimal>,
    fetches: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl ScriptedPriceSource {
    pub fn new(script: Vec<Decimal>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub fn fixed(price: Decimal) -> Self {
        Self {
            fallback: Some(price),
            ..Default::default()
        }
    }

    pub fn slow(price: Decimal, delay: Duration) -> Self {
        Self {
            fallback: Some(price),
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    fn id(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_quote(&self, symbol: &str) -> std::result::Result<SourceQuote, MarketDataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MarketDataError::ProviderError {
                provider: self.id().to_string(),
                message: "scripted outage".to_string(),
            });
        }
        let next = self.script.lock().unwrap().pop_front().or(self.fallback);
        match next {
            Some(price) => Ok(SourceQuote::new(symbol, price, self.id())),
            None => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }
}

// =========================================================================
// Quote store
// =========================================================================

#[derive(Default)]
pub struct MemoryQuoteStore {
    latest: Mutex<HashMap<String, Quote>>,
    history: Mutex<Vec<Quote>>,
    writes: AtomicUsize,
    history_always_duplicate: AtomicBool,
    history_broken: AtomicBool,
}

impl MemoryQuoteStore {
    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        let store = Self::default();
        {
            let mut latest = store.latest.lock().unwrap();
            for quote in quotes {
                latest.insert(quote.symbol.clone(), quote);
            }
        }
        store
    }

    pub fn set_history_always_duplicate(&self, value: bool) {
        self.history_always_duplicate.store(value, Ordering::SeqCst);
    }

    pub fn set_history_broken(&self, value: bool) {
        self.history_broken.store(value, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().unwrap().len()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn upsert_latest(&self, quote: &Quote) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.latest
            .lock()
            .unwrap()
            .insert(quote.symbol.clone(), quote.clone());
        Ok(())
    }

    async fn append_history(&self, quote: &Quote) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.history_broken.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk full".to_string(),
            )));
        }
        let mut history = self.history.lock().unwrap();
        let clash = history
            .iter()
            .any(|h| h.symbol == quote.symbol && h.fetched_at == quote.fetched_at);
        if clash || self.history_always_duplicate.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                "price_history(symbol, as_of)".to_string(),
            )));
        }
        history.push(quote.clone());
        Ok(())
    }

    fn get_latest(&self, symbol: &str) -> Result<Option<Quote>> {
        Ok(self.latest.lock().unwrap().get(symbol).cloned())
    }

    fn get_latest_many(&self, symbols: &[String]) -> Result<HashMap<String, Quote>> {
        let latest = self.latest.lock().unwrap();
        Ok(symbols
            .iter()
            .filter_map(|s| latest.get(s).map(|q| (s.clone(), q.clone())))
            .collect())
    }

    fn list_history(&self, symbol: &str) -> Result<Vec<Quote>> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.symbol == symbol)
            .cloned()
            .collect())
    }
}

// =========================================================================
// Stocks
// =========================================================================

#[derive(Default)]
pub struct MemoryStockRepository {
    stocks: Mutex<BTreeMap<String, Stock>>,
}

impl MemoryStockRepository {
    pub fn with_symbols(symbols: &[&str]) -> Self {
        let repo = Self::default();
        for symbol in symbols {
            repo.provision(symbol);
        }
        repo
    }

    pub fn provision(&self, symbol: &str) {
        self.stocks
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_insert_with(|| Stock::provisioned(symbol, Utc::now()));
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.lock().unwrap().contains_key(symbol)
    }
}

#[async_trait]
impl StockRepositoryTrait for MemoryStockRepository {
    fn list_active_symbols(&self) -> Result<Vec<String>> {
        Ok(self
            .stocks
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.status == StockStatus::Active)
            .map(|s| s.symbol.clone())
            .collect())
    }

    fn get(&self, symbol: &str) -> Result<Option<Stock>> {
        Ok(self.stocks.lock().unwrap().get(symbol).cloned())
    }

    async fn set_status(&self, symbol: &str, status: StockStatus) -> Result<Stock> {
        let mut stocks = self.stocks.lock().unwrap();
        let stock = stocks
            .get_mut(symbol)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(symbol.to_string())))?;
        stock.status = status;
        Ok(stock.clone())
    }
}

// =========================================================================
// Ledger (rewards + positions)
// =========================================================================

#[derive(Clone, Default)]
struct LedgerState {
    users: BTreeSet<String>,
    events: Vec<RewardEvent>,
    entries: Vec<LedgerEntry>,
    positions: BTreeMap<(String, String), Position>,
}

/// Single-lock ledger: every `record_reward` runs against a copy of the
/// state that replaces the original only on success.
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
    stocks: Arc<MemoryStockRepository>,
    fail_after_postings: AtomicBool,
}

impl MemoryLedger {
    pub fn new(stocks: Arc<MemoryStockRepository>) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            stocks,
            fail_after_postings: AtomicBool::new(false),
        }
    }

    pub fn set_fail_after_postings(&self, fail: bool) {
        self.fail_after_postings.store(fail, Ordering::SeqCst);
    }

    pub fn insert_position(&self, position: Position) {
        self.state.lock().unwrap().positions.insert(
            (position.user_id.clone(), position.symbol.clone()),
            position,
        );
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().unwrap().events.len()
    }

    pub fn entry_count(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }
}

#[async_trait]
impl RewardRepositoryTrait for MemoryLedger {
    async fn record_reward(
        &self,
        event: RewardEvent,
        postings: Vec<LedgerEntry>,
    ) -> Result<Position> {
        let mut guard = self.state.lock().unwrap();
        let mut draft = guard.clone();

        draft.users.insert(event.user_id.clone());
        let provision_stock = !self.stocks.contains(&event.symbol);

        if draft.events.iter().any(|e| e.event_key == event.event_key) {
            return Err(Error::Reward(RewardError::DuplicateEvent(event.event_key)));
        }
        draft.events.push(event.clone());
        draft.entries.extend(postings);

        if self.fail_after_postings.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::TransactionFailed(
                "position update failed".to_string(),
            )));
        }

        let key = (event.user_id.clone(), event.symbol.clone());
        let current = draft
            .positions
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Position::empty(&event.user_id, &event.symbol, event.created_at));
        let updated = current.apply_reward(event.shares, event.granted_price, event.created_at)?;
        draft.positions.insert(key, updated.clone());

        *guard = draft;
        if provision_stock {
            self.stocks.provision(&event.symbol);
        }
        Ok(updated)
    }

    fn get_by_id(&self, event_id: &str) -> Result<Option<RewardEvent>> {
        let state = self.state.lock().unwrap();
        Ok(state.events.iter().find(|e| e.id == event_id).cloned())
    }

    fn get_by_event_key(&self, event_key: &str) -> Result<Option<RewardEvent>> {
        let state = self.state.lock().unwrap();
        Ok(state.events.iter().find(|e| e.event_key == event_key).cloned())
    }

    fn list_ledger_entries(&self, event_id: &str) -> Result<Vec<LedgerEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect())
    }

    fn list_rewarded_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RewardEvent>> {
        let state = self.state.lock().unwrap();
        let mut events: Vec<RewardEvent> = state
            .events
            .iter()
            .filter(|e| e.user_id == user_id && e.rewarded_at >= start && e.rewarded_at < end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.rewarded_at);
        Ok(events)
    }
}

impl PositionRepositoryTrait for MemoryLedger {
    fn get(&self, user_id: &str, symbol: &str) -> Result<Option<Position>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .positions
            .get(&(user_id.to_string(), symbol.to_string()))
            .cloned())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Position>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .positions
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Position>> {
        Ok(self.state.lock().unwrap().positions.values().cloned().collect())
    }
}

// =========================================================================
// Daily holdings
// =========================================================================

#[derive(Default)]
pub struct MemoryHoldings {
    rows: Mutex<BTreeMap<(String, NaiveDate), DailyHolding>>,
    failing_users: Mutex<HashSet<String>>,
}

impl MemoryHoldings {
    pub fn fail_for(&self, user_id: &str) {
        self.failing_users.lock().unwrap().insert(user_id.to_string());
    }

    pub fn insert(&self, holding: DailyHolding) {
        self.rows
            .lock()
            .unwrap()
            .insert((holding.user_id.clone(), holding.date), holding);
    }

    pub fn all(&self) -> Vec<DailyHolding> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for MemoryHoldings {
    async fn upsert_daily(&self, holding: DailyHolding) -> Result<()> {
        if self.failing_users.lock().unwrap().contains(&holding.user_id) {
            return Err(Error::Database(DatabaseError::QueryFailed(format!(
                "cannot write holding for {}",
                holding.user_id
            ))));
        }
        self.insert(holding);
        Ok(())
    }

    fn list_before(&self, user_id: &str, before: NaiveDate) -> Result<Vec<DailyHolding>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|h| h.user_id == user_id && h.date < before)
            .cloned()
            .collect())
    }

    fn get(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyHolding>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), date))
            .cloned())
    }
}

pub fn quote(symbol: &str, price: Decimal, fetched_at: DateTime<Utc>) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price_inr: price,
        source: "fixture".to_string(),
        fetched_at,
    }
}
