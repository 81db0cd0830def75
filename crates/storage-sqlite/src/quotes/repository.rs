use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{PriceHistoryDB, QuoteDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::price_history::dsl as history_dsl;
use crate::schema::price_quotes::dsl as quotes_dsl;
use crate::utils::chunk_for_sqlite;
use stocky_core::quotes::{Quote, QuoteStore};
use stocky_core::Result;

pub struct QuoteRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl QuoteRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    async fn upsert_latest(&self, quote: &Quote) -> Result<()> {
        let row = QuoteDB::from(quote);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(quotes_dsl::price_quotes)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn append_history(&self, quote: &Quote) -> Result<()> {
        let row = PriceHistoryDB::from(quote);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(history_dsl::price_history)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn get_latest(&self, symbol: &str) -> Result<Option<Quote>> {
        let mut conn = get_connection(&self.pool)?;

        let row = quotes_dsl::price_quotes
            .find(symbol)
            .select(QuoteDB::as_select())
            .first::<QuoteDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Quote::try_from).transpose()?)
    }

    fn get_latest_many(&self, symbols: &[String]) -> Result<HashMap<String, Quote>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = get_connection(&self.pool)?;

        let mut quotes = HashMap::with_capacity(symbols.len());
        for chunk in chunk_for_sqlite(symbols) {
            let rows = quotes_dsl::price_quotes
                .filter(quotes_dsl::symbol.eq_any(chunk))
                .select(QuoteDB::as_select())
                .load::<QuoteDB>(&mut conn)
                .into_core()?;
            for row in rows {
                let quote = Quote::try_from(row)?;
                quotes.insert(quote.symbol.clone(), quote);
            }
        }
        Ok(quotes)
    }

    fn list_history(&self, symbol: &str) -> Result<Vec<Quote>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = history_dsl::price_history
            .filter(history_dsl::symbol.eq(symbol))
            .order(history_dsl::as_of.asc())
            .select(PriceHistoryDB::as_select())
            .load::<PriceHistoryDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| Quote::try_from(row).map_err(Into::into))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stocks::StockRepository;
    use crate::test_utils::test_db;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use stocky_core::errors::{DatabaseError, Error};
    use stocky_core::quotes::{QuoteService, QuoteServiceTrait};
    use stocky_core::stocks::Stock;
    use stocky_core::Deadlines;
    use stocky_market_data::{MarketDataError, PriceSource, SourceQuote};

    fn quote(symbol: &str, price: Decimal, at: DateTime<Utc>) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price_inr: price,
            source: "test".to_string(),
            fetched_at: at,
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap()
    }

    /// Always quotes the same instant, so every persist after the first
    /// collides in the history table.
    struct FrozenClockSource {
        at: DateTime<Utc>,
    }

    #[async_trait]
    impl PriceSource for FrozenClockSource {
        fn id(&self) -> &'static str {
            "frozen"
        }

        async fn fetch_quote(&self, symbol: &str) -> std::result::Result<SourceQuote, MarketDataError> {
            let mut quote = SourceQuote::new(symbol, dec!(1500.25), self.id());
            quote.timestamp = self.at;
            Ok(quote)
        }
    }

    #[tokio::test]
    async fn test_upsert_latest_overwrites_single_row() {
        let db = test_db();
        let repo = QuoteRepository::new(Arc::clone(&db.pool), db.writer.clone());

        repo.upsert_latest(&quote("TCS", dec!(3000), at(0))).await.unwrap();
        repo.upsert_latest(&quote("TCS", dec!(3100.5), at(5))).await.unwrap();

        let latest = repo.get_latest("TCS").unwrap().unwrap();
        assert_eq!(latest.price_inr, dec!(3100.5));
        assert_eq!(latest.fetched_at, at(5));
        assert!(repo.get_latest("INFY").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_history_rejects_same_instant() {
        let db = test_db();
        let repo = QuoteRepository::new(Arc::clone(&db.pool), db.writer.clone());

        repo.append_history(&quote("TCS", dec!(3000), at(0))).await.unwrap();
        repo.append_history(&quote("TCS", dec!(3050), at(1))).await.unwrap();
        let err = repo
            .append_history(&quote("TCS", dec!(9999), at(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::UniqueViolation(_))));

        let prices: Vec<Decimal> = repo
            .list_history("TCS")
            .unwrap()
            .into_iter()
            .map(|q| q.price_inr)
            .collect();
        assert_eq!(prices, vec![dec!(3000), dec!(3050)]);
    }

    #[tokio::test]
    async fn test_get_latest_many_returns_only_cached() {
        let db = test_db();
        let repo = QuoteRepository::new(Arc::clone(&db.pool), db.writer.clone());
        repo.upsert_latest(&quote("TCS", dec!(3000), at(0))).await.unwrap();
        repo.upsert_latest(&quote("INFY", dec!(1500), at(0))).await.unwrap();

        let wanted = vec!["TCS".to_string(), "WIPRO".to_string()];
        let quotes = repo.get_latest_many(&wanted).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes["TCS"].price_inr, dec!(3000));
        assert!(repo.get_latest_many(&[]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_swallows_duplicate_history_rows() {
        let db = test_db();
        let quotes = Arc::new(QuoteRepository::new(Arc::clone(&db.pool), db.writer.clone()));
        let stocks = Arc::new(StockRepository::new(Arc::clone(&db.pool), db.writer.clone()));

        let mut conn = get_connection(&db.pool).unwrap();
        diesel::insert_into(crate::schema::stocks::table)
            .values(&crate::stocks::StockDB::from(&Stock::provisioned("TCS", at(0))))
            .execute(&mut conn)
            .unwrap();

        let source: Arc<dyn PriceSource> = Arc::new(FrozenClockSource { at: at(30) });
        let service = QuoteService::new(quotes.clone(), stocks, Some(source), Deadlines::default());

        service.refresh_all().await.unwrap();
        let second = service.refresh_all().await.unwrap();

        assert_eq!(second.len(), 1);
        assert_eq!(quotes.list_history("TCS").unwrap().len(), 1);
        assert_eq!(
            quotes.get_latest("TCS").unwrap().unwrap().price_inr,
            dec!(1500.25)
        );
    }
}
