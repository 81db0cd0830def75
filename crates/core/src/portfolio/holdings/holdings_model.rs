use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total portfolio value of one user on one UTC calendar day.
///
/// Keyed by `(user_id, date)`; revaluing the same day overwrites the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHolding {
    pub user_id: String,
    pub date: NaiveDate,
    pub total_value_inr: Decimal,
    pub updated_at: DateTime<Utc>,
}
