use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::StockDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::stocks::dsl::*;
use stocky_core::errors::{DatabaseError, Error};
use stocky_core::stocks::{Stock, StockRepositoryTrait, StockStatus, STOCK_STATUS_ACTIVE};
use stocky_core::Result;

pub struct StockRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl StockRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl StockRepositoryTrait for StockRepository {
    fn list_active_symbols(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        stocks
            .filter(status.eq(STOCK_STATUS_ACTIVE))
            .order(symbol.asc())
            .select(symbol)
            .load::<String>(&mut conn)
            .into_core()
    }

    fn get(&self, symbol_key: &str) -> Result<Option<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let row = stocks
            .find(symbol_key)
            .select(StockDB::as_select())
            .first::<StockDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Stock::try_from).transpose()?)
    }

    async fn set_status(&self, symbol_key: &str, new_status: StockStatus) -> Result<Stock> {
        let symbol_owned = symbol_key.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Stock> {
                let updated = diesel::update(stocks.find(&symbol_owned))
                    .set(status.eq(new_status.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "stock {}",
                        symbol_owned
                    ))));
                }

                let row = stocks
                    .find(&symbol_owned)
                    .select(StockDB::as_select())
                    .first::<StockDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Stock::try_from(row)?)
            })
            .await
    }
}
