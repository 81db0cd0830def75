use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::PositionDB;
use crate::db::get_connection;
use crate::errors::{IntoCore, StorageError};
use crate::schema::user_positions::dsl as positions_dsl;
use stocky_core::positions::{Position, PositionRepositoryTrait};
use stocky_core::Result;

/// Read side of `user_positions`. Writes happen in the reward transaction.
pub struct PositionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PositionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

fn to_positions(rows: Vec<PositionDB>) -> Result<Vec<Position>> {
    rows.into_iter()
        .map(|row| Position::try_from(row).map_err(|e: StorageError| e.into()))
        .collect()
}

impl PositionRepositoryTrait for PositionRepository {
    fn get(&self, user_id: &str, symbol: &str) -> Result<Option<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let row = positions_dsl::user_positions
            .find((user_id, symbol))
            .select(PositionDB::as_select())
            .first::<PositionDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Position::try_from).transpose()?)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = positions_dsl::user_positions
            .filter(positions_dsl::user_id.eq(user_id))
            .order(positions_dsl::symbol.asc())
            .select(PositionDB::as_select())
            .load::<PositionDB>(&mut conn)
            .into_core()?;
        to_positions(rows)
    }

    fn list_all(&self) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = positions_dsl::user_positions
            .order((positions_dsl::user_id.asc(), positions_dsl::symbol.asc()))
            .select(PositionDB::as_select())
            .load::<PositionDB>(&mut conn)
            .into_core()?;
        to_positions(rows)
    }
}
