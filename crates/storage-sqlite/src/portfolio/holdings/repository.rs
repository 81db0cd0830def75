use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::DailyHoldingDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::daily_holdings::dsl as holdings_dsl;
use crate::utils::format_date;
use stocky_core::portfolio::holdings::{DailyHolding, HoldingsRepositoryTrait};
use stocky_core::Result;

pub struct HoldingsRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl HoldingsRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for HoldingsRepository {
    async fn upsert_daily(&self, holding: DailyHolding) -> Result<()> {
        let row = DailyHoldingDB::from(&holding);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(holdings_dsl::daily_holdings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn list_before(&self, user_id: &str, before: NaiveDate) -> Result<Vec<DailyHolding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = holdings_dsl::daily_holdings
            .filter(holdings_dsl::user_id.eq(user_id))
            .filter(holdings_dsl::date.lt(format_date(&before)))
            .order(holdings_dsl::date.asc())
            .select(DailyHoldingDB::as_select())
            .load::<DailyHoldingDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| DailyHolding::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyHolding>> {
        let mut conn = get_connection(&self.pool)?;
        let row = holdings_dsl::daily_holdings
            .find((user_id, format_date(&date)))
            .select(DailyHoldingDB::as_select())
            .first::<DailyHoldingDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(DailyHolding::try_from).transpose()?)
    }
}
