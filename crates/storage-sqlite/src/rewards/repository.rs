use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{LedgerAccountDB, LedgerEntryDB, RewardEventDB, UserDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::positions::PositionDB;
use crate::schema::{
    ledger_accounts, ledger_entries, reward_events, stocks, user_positions, users,
};
use crate::stocks::StockDB;
use crate::utils::format_timestamp;
use stocky_core::errors::Error;
use stocky_core::positions::Position;
use stocky_core::rewards::{LedgerEntry, RewardError, RewardEvent, RewardRepositoryTrait};
use stocky_core::stocks::Stock;
use stocky_core::Result;

pub struct RewardRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl RewardRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn duplicate(event_key: &str) -> Error {
    Error::Reward(RewardError::DuplicateEvent(event_key.to_string()))
}

/// Runs inside the writer's `BEGIN IMMEDIATE` transaction; any error rolls
/// back every statement below.
fn record_in_transaction(
    conn: &mut SqliteConnection,
    event: &RewardEvent,
    postings: &[LedgerEntry],
) -> Result<Position> {
    diesel::insert_or_ignore_into(users::table)
        .values(&UserDB {
            id: event.user_id.clone(),
            created_at: format_timestamp(&event.created_at),
        })
        .execute(conn)
        .map_err(StorageError::from)?;

    diesel::insert_or_ignore_into(stocks::table)
        .values(&StockDB::from(&Stock::provisioned(
            &event.symbol,
            event.created_at,
        )))
        .execute(conn)
        .map_err(StorageError::from)?;

    let existing: i64 = reward_events::table
        .filter(reward_events::event_key.eq(&event.event_key))
        .count()
        .get_result(conn)
        .map_err(StorageError::from)?;
    if existing > 0 {
        return Err(duplicate(&event.event_key));
    }

    match diesel::insert_into(reward_events::table)
        .values(&RewardEventDB::from(event))
        .execute(conn)
    {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(duplicate(&event.event_key));
        }
        Err(e) => return Err(StorageError::from(e).into()),
    }

    let accounts: Vec<LedgerAccountDB> = postings.iter().map(LedgerAccountDB::from).collect();
    diesel::insert_or_ignore_into(ledger_accounts::table)
        .values(&accounts)
        .execute(conn)
        .map_err(StorageError::from)?;

    let rows: Vec<LedgerEntryDB> = postings
        .iter()
        .enumerate()
        .map(|(line_no, entry)| LedgerEntryDB::from_entry(entry, line_no as i32))
        .collect();
    diesel::insert_into(ledger_entries::table)
        .values(&rows)
        .execute(conn)
        .map_err(StorageError::from)?;

    let current = user_positions::table
        .find((&event.user_id, &event.symbol))
        .select(PositionDB::as_select())
        .first::<PositionDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Position::try_from)
        .transpose()?
        .unwrap_or_else(|| Position::empty(&event.user_id, &event.symbol, event.created_at));

    let updated = current.apply_reward(event.shares, event.granted_price, event.created_at)?;
    diesel::replace_into(user_positions::table)
        .values(&PositionDB::from(&updated))
        .execute(conn)
        .map_err(StorageError::from)?;

    Ok(updated)
}

#[async_trait]
impl RewardRepositoryTrait for RewardRepository {
    async fn record_reward(
        &self,
        event: RewardEvent,
        postings: Vec<LedgerEntry>,
    ) -> Result<Position> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let position = record_in_transaction(conn, &event, &postings)?;
                debug!(
                    "Recorded reward {} ({} postings) for {}/{}",
                    event.id,
                    postings.len(),
                    event.user_id,
                    event.symbol
                );
                Ok(position)
            })
            .await
    }

    fn get_by_id(&self, event_id: &str) -> Result<Option<RewardEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let row = reward_events::table
            .find(event_id)
            .select(RewardEventDB::as_select())
            .first::<RewardEventDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(RewardEvent::try_from).transpose()?)
    }

    fn get_by_event_key(&self, event_key: &str) -> Result<Option<RewardEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let row = reward_events::table
            .filter(reward_events::event_key.eq(event_key))
            .select(RewardEventDB::as_select())
            .first::<RewardEventDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(RewardEvent::try_from).transpose()?)
    }

    fn list_ledger_entries(&self, event_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_entries::table
            .filter(ledger_entries::event_id.eq(event_id))
            .order(ledger_entries::line_no.asc())
            .select(LedgerEntryDB::as_select())
            .load::<LedgerEntryDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| LedgerEntry::try_from(row).map_err(Into::into))
            .collect()
    }

    fn list_rewarded_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RewardEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = reward_events::table
            .filter(reward_events::user_id.eq(user_id))
            .filter(reward_events::rewarded_at.ge(format_timestamp(&start)))
            .filter(reward_events::rewarded_at.lt(format_timestamp(&end)))
            .order((reward_events::rewarded_at.asc(), reward_events::created_at.asc()))
            .select(RewardEventDB::as_select())
            .load::<RewardEventDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| RewardEvent::try_from(row).map_err(Into::into))
            .collect()
    }
}
