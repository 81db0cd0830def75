//! Database models for latest quotes and price history rows.

use diesel::prelude::*;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::utils::{format_decimal, format_timestamp, parse_decimal, parse_timestamp};
use chrono::Utc;
use stocky_core::quotes::Quote;

/// Row of `price_quotes`, one per symbol.
#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::price_quotes)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub symbol: String,
    pub price_inr: String,
    pub source: String,
    pub fetched_at: String,
}

/// Row of the append-only `price_history`.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::price_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceHistoryDB {
    pub id: String,
    pub symbol: String,
    pub price_inr: String,
    pub source: String,
    pub as_of: String,
    pub created_at: String,
}

impl From<&Quote> for QuoteDB {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            price_inr: format_decimal(&quote.price_inr),
            source: quote.source.clone(),
            fetched_at: format_timestamp(&quote.fetched_at),
        }
    }
}

impl TryFrom<QuoteDB> for Quote {
    type Error = StorageError;

    fn try_from(db: QuoteDB) -> Result<Self, Self::Error> {
        Ok(Quote {
            price_inr: parse_decimal(&db.price_inr)?,
            fetched_at: parse_timestamp(&db.fetched_at)?,
            symbol: db.symbol,
            source: db.source,
        })
    }
}

impl From<&Quote> for PriceHistoryDB {
    fn from(quote: &Quote) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            symbol: quote.symbol.clone(),
            price_inr: format_decimal(&quote.price_inr),
            source: quote.source.clone(),
            as_of: format_timestamp(&quote.fetched_at),
            created_at: format_timestamp(&Utc::now()),
        }
    }
}

impl TryFrom<PriceHistoryDB> for Quote {
    type Error = StorageError;

    fn try_from(db: PriceHistoryDB) -> Result<Self, Self::Error> {
        Ok(Quote {
            price_inr: parse_decimal(&db.price_inr)?,
            fetched_at: parse_timestamp(&db.as_of)?,
            symbol: db.symbol,
            source: db.source,
        })
    }
}
