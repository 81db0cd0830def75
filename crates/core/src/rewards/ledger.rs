//! Double-entry postings for reward events.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rewards_model::RewardEvent;
use crate::constants::{
    BROKERAGE_EXPENSE_ACCOUNT, CASH_ACCOUNT, MEMO_BROKERAGE, MEMO_CASH_OUTFLOW,
    MEMO_STOCK_INVENTORY, MEMO_TAXES, STOCK_INVENTORY_ACCOUNT_PREFIX, TAX_EXPENSE_ACCOUNT,
};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::decimal_utils::{amount_out_of_range, round_amount};

pub const ACCOUNT_TYPE_ASSET: &str = "asset";
pub const ACCOUNT_TYPE_EXPENSE: &str = "expense";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => ACCOUNT_TYPE_ASSET,
            AccountType::Expense => ACCOUNT_TYPE_EXPENSE,
        }
    }
}

impl TryFrom<&str> for AccountType {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            ACCOUNT_TYPE_ASSET => Ok(AccountType::Asset),
            ACCOUNT_TYPE_EXPENSE => Ok(AccountType::Expense),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown account type '{}'",
                other
            )))),
        }
    }
}

/// One posting of a reward event. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub event_id: String,
    pub account_code: String,
    pub account_type: AccountType,
    pub symbol: Option<String>,
    pub debit_inr: Decimal,
    pub credit_inr: Decimal,
    pub stock_units: Option<Decimal>,
    pub memo: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    fn posting(
        event: &RewardEvent,
        account_code: String,
        account_type: AccountType,
        debit_inr: Decimal,
        credit_inr: Decimal,
        memo: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: event.id.clone(),
            account_code,
            account_type,
            symbol: None,
            debit_inr,
            credit_inr,
            stock_units: None,
            memo: memo.to_string(),
            created_at: event.created_at,
        }
    }
}

/// Builds the four postings of a reward:
///
/// | account | type | debit | credit |
/// |---|---|---|---|
/// | `stock_inventory:{SYMBOL}` | asset | cost | |
/// | `brokerage_expense` | expense | brokerage | |
/// | `tax_expense` | expense | taxes | |
/// | `cash` | asset | | total |
pub fn build_postings(event: &RewardEvent) -> Result<Vec<LedgerEntry>> {
    let cost = event
        .granted_price
        .checked_mul(event.shares)
        .map(round_amount)
        .ok_or_else(|| amount_out_of_range("inventory posting"))?;

    let mut inventory = LedgerEntry::posting(
        event,
        format!("{}:{}", STOCK_INVENTORY_ACCOUNT_PREFIX, event.symbol),
        AccountType::Asset,
        cost,
        Decimal::ZERO,
        MEMO_STOCK_INVENTORY,
    );
    inventory.symbol = Some(event.symbol.clone());
    inventory.stock_units = Some(event.shares);

    Ok(vec![
        inventory,
        LedgerEntry::posting(
            event,
            BROKERAGE_EXPENSE_ACCOUNT.to_string(),
            AccountType::Expense,
            event.brokerage_inr,
            Decimal::ZERO,
            MEMO_BROKERAGE,
        ),
        LedgerEntry::posting(
            event,
            TAX_EXPENSE_ACCOUNT.to_string(),
            AccountType::Expense,
            event.taxes_inr,
            Decimal::ZERO,
            MEMO_TAXES,
        ),
        LedgerEntry::posting(
            event,
            CASH_ACCOUNT.to_string(),
            AccountType::Asset,
            Decimal::ZERO,
            event.total_cash_out_inr,
            MEMO_CASH_OUTFLOW,
        ),
    ])
}

/// Sum of debits and sum of credits, or `None` if either overflows.
pub fn posting_totals(entries: &[LedgerEntry]) -> Option<(Decimal, Decimal)> {
    entries
        .iter()
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(d, c), e| {
            Some((d.checked_add(e.debit_inr)?, c.checked_add(e.credit_inr)?))
        })
}

/// Overflowing totals count as unbalanced.
pub fn is_balanced(entries: &[LedgerEntry]) -> bool {
    matches!(posting_totals(entries), Some((debits, credits)) if debits == credits)
}
