use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{
    format_date, format_decimal, format_timestamp, parse_date, parse_decimal, parse_timestamp,
};
use stocky_core::portfolio::holdings::DailyHolding;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::daily_holdings)]
#[diesel(primary_key(user_id, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyHoldingDB {
    pub user_id: String,
    pub date: String,
    pub total_value_inr: String,
    pub updated_at: String,
}

impl From<&DailyHolding> for DailyHoldingDB {
    fn from(holding: &DailyHolding) -> Self {
        Self {
            user_id: holding.user_id.clone(),
            date: format_date(&holding.date),
            total_value_inr: format_decimal(&holding.total_value_inr),
            updated_at: format_timestamp(&holding.updated_at),
        }
    }
}

impl TryFrom<DailyHoldingDB> for DailyHolding {
    type Error = StorageError;

    fn try_from(db: DailyHoldingDB) -> Result<Self, Self::Error> {
        Ok(DailyHolding {
            date: parse_date(&db.date)?,
            total_value_inr: parse_decimal(&db.total_value_inr)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            user_id: db.user_id,
        })
    }
}
