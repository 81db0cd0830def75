use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};
use stocky_core::stocks::{Stock, StockStatus};

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stocks)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockDB {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub status: String,
    pub created_at: String,
}

impl From<&Stock> for StockDB {
    fn from(stock: &Stock) -> Self {
        Self {
            symbol: stock.symbol.clone(),
            name: stock.name.clone(),
            exchange: stock.exchange.clone(),
            status: stock.status.as_str().to_string(),
            created_at: format_timestamp(&stock.created_at),
        }
    }
}

impl TryFrom<StockDB> for Stock {
    type Error = StorageError;

    fn try_from(db: StockDB) -> Result<Self, Self::Error> {
        Ok(Stock {
            created_at: parse_timestamp(&db.created_at)?,
            status: StockStatus::from(db.status.as_str()),
            symbol: db.symbol,
            name: db.name,
            exchange: db.exchange,
        })
    }
}
