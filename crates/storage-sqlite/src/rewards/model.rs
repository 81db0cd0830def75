//! Database models for users, reward events, ledger accounts and postings.

use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_decimal, format_timestamp, parse_decimal, parse_timestamp};
use stocky_core::rewards::{AccountType, LedgerEntry, RewardEvent};

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub created_at: String,
}

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::reward_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RewardEventDB {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub shares: String,
    pub granted_price: String,
    pub brokerage_inr: String,
    pub taxes_inr: String,
    pub total_cash_out_inr: String,
    pub rewarded_at: String,
    pub created_at: String,
    pub event_key: String,
}

/// Chart-of-accounts row; created on first use by a posting.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::ledger_accounts)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerAccountDB {
    pub code: String,
    pub account_type: String,
    pub created_at: String,
}

impl From<&LedgerEntry> for LedgerAccountDB {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            code: entry.account_code.clone(),
            account_type: entry.account_type.as_str().to_string(),
            created_at: format_timestamp(&entry.created_at),
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryDB {
    pub id: String,
    pub event_id: String,
    pub line_no: i32,
    pub account_code: String,
    pub account_type: String,
    pub symbol: Option<String>,
    pub debit_inr: String,
    pub credit_inr: String,
    pub stock_units: Option<String>,
    pub memo: String,
    pub created_at: String,
}

impl From<&RewardEvent> for RewardEventDB {
    fn from(event: &RewardEvent) -> Self {
        Self {
            id: event.id.clone(),
            user_id: event.user_id.clone(),
            symbol: event.symbol.clone(),
            shares: format_decimal(&event.shares),
            granted_price: format_decimal(&event.granted_price),
            brokerage_inr: format_decimal(&event.brokerage_inr),
            taxes_inr: format_decimal(&event.taxes_inr),
            total_cash_out_inr: format_decimal(&event.total_cash_out_inr),
            rewarded_at: format_timestamp(&event.rewarded_at),
            created_at: format_timestamp(&event.created_at),
            event_key: event.event_key.clone(),
        }
    }
}

impl TryFrom<RewardEventDB> for RewardEvent {
    type Error = StorageError;

    fn try_from(db: RewardEventDB) -> Result<Self, Self::Error> {
        Ok(RewardEvent {
            shares: parse_decimal(&db.shares)?,
            granted_price: parse_decimal(&db.granted_price)?,
            brokerage_inr: parse_decimal(&db.brokerage_inr)?,
            taxes_inr: parse_decimal(&db.taxes_inr)?,
            total_cash_out_inr: parse_decimal(&db.total_cash_out_inr)?,
            rewarded_at: parse_timestamp(&db.rewarded_at)?,
            created_at: parse_timestamp(&db.created_at)?,
            id: db.id,
            user_id: db.user_id,
            symbol: db.symbol,
            event_key: db.event_key,
        })
    }
}

impl LedgerEntryDB {
    /// `line_no` is the posting's position in the event's set.
    pub fn from_entry(entry: &LedgerEntry, line_no: i32) -> Self {
        Self {
            id: entry.id.clone(),
            event_id: entry.event_id.clone(),
            line_no,
            account_code: entry.account_code.clone(),
            account_type: entry.account_type.as_str().to_string(),
            symbol: entry.symbol.clone(),
            debit_inr: format_decimal(&entry.debit_inr),
            credit_inr: format_decimal(&entry.credit_inr),
            stock_units: entry.stock_units.as_ref().map(format_decimal),
            memo: entry.memo.clone(),
            created_at: format_timestamp(&entry.created_at),
        }
    }
}

impl TryFrom<LedgerEntryDB> for LedgerEntry {
    type Error = StorageError;

    fn try_from(db: LedgerEntryDB) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            account_type: AccountType::try_from(db.account_type.as_str())
                .map_err(|e| StorageError::SerializationError(e.to_string()))?,
            debit_inr: parse_decimal(&db.debit_inr)?,
            credit_inr: parse_decimal(&db.credit_inr)?,
            stock_units: db.stock_units.as_deref().map(parse_decimal).transpose()?,
            created_at: parse_timestamp(&db.created_at)?,
            id: db.id,
            event_id: db.event_id,
            account_code: db.account_code,
            symbol: db.symbol,
            memo: db.memo,
        })
    }
}
