use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_decimal, format_timestamp, parse_decimal, parse_timestamp};
use stocky_core::positions::Position;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::user_positions)]
#[diesel(primary_key(user_id, symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub user_id: String,
    pub symbol: String,
    pub net_shares: String,
    pub avg_cost_inr: String,
    pub updated_at: String,
}

impl From<&Position> for PositionDB {
    fn from(position: &Position) -> Self {
        Self {
            user_id: position.user_id.clone(),
            symbol: position.symbol.clone(),
            net_shares: format_decimal(&position.net_shares),
            avg_cost_inr: format_decimal(&position.avg_cost_inr),
            updated_at: format_timestamp(&position.updated_at),
        }
    }
}

impl TryFrom<PositionDB> for Position {
    type Error = StorageError;

    fn try_from(db: PositionDB) -> Result<Self, Self::Error> {
        Ok(Position {
            net_shares: parse_decimal(&db.net_shares)?,
            avg_cost_inr: parse_decimal(&db.avg_cost_inr)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            user_id: db.user_id,
            symbol: db.symbol,
        })
    }
}
