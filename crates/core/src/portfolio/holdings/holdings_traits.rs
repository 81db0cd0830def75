use async_trait::async_trait;
use chrono::NaiveDate;

use super::holdings_model::DailyHolding;
use crate::errors::Result;

#[async_trait]
pub trait HoldingsRepositoryTrait: Send + Sync {
    /// Inserts or overwrites the row for `(holding.user_id, holding.date)`.
    async fn upsert_daily(&self, holding: DailyHolding) -> Result<()>;

    /// Rows for a user with `date < before`, oldest first.
    fn list_before(&self, user_id: &str, before: NaiveDate) -> Result<Vec<DailyHolding>>;

    fn get(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyHolding>>;
}
