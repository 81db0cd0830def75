use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::valuation_calculator::value_by_user;
use super::valuation_model::{ValuationCycleOutcome, ValuationSkip, ValuationSummary};
use crate::errors::Result;
use crate::portfolio::holdings::{DailyHolding, HoldingsRepositoryTrait};
use crate::positions::PositionRepositoryTrait;
use crate::quotes::QuoteServiceTrait;
use crate::utils::deadline_utils::{with_storage_deadline, Deadlines};
use crate::utils::time_utils::today_utc;

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Runs one cycle for the current UTC date.
    ///
    /// A failed price refresh aborts the cycle before anything is written.
    /// A failed upsert for one user is logged and does not stop the others.
    async fn run_cycle(&self) -> Result<ValuationCycleOutcome>;

    /// Same as [`run_cycle`](Self::run_cycle) for an explicit date.
    async fn run_cycle_on(&self, date: NaiveDate) -> Result<ValuationCycleOutcome>;
}

#[derive(Clone)]
pub struct ValuationService {
    quote_service: Arc<dyn QuoteServiceTrait>,
    positions: Arc<dyn PositionRepositoryTrait>,
    holdings: Arc<dyn HoldingsRepositoryTrait>,
    deadlines: Deadlines,
}

impl ValuationService {
    pub fn new(
        quote_service: Arc<dyn QuoteServiceTrait>,
        positions: Arc<dyn PositionRepositoryTrait>,
        holdings: Arc<dyn HoldingsRepositoryTrait>,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            quote_service,
            positions,
            holdings,
            deadlines,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn run_cycle(&self) -> Result<ValuationCycleOutcome> {
        self.run_cycle_on(today_utc()).await
    }

    async fn run_cycle_on(&self, date: NaiveDate) -> Result<ValuationCycleOutcome> {
        let quotes = self.quote_service.refresh_all().await?;
        if quotes.is_empty() {
            debug!("Valuation skipped: no quotes refreshed");
            return Ok(ValuationCycleOutcome::Skipped(ValuationSkip::NoQuotes));
        }

        let positions = self.positions.list_all()?;
        if positions.is_empty() {
            debug!("Valuation skipped: no positions");
            return Ok(ValuationCycleOutcome::Skipped(ValuationSkip::NoPositions));
        }

        let quotes: HashMap<_, _> = quotes.into_iter().map(|q| (q.symbol.clone(), q)).collect();
        let valuations = value_by_user(&positions, &quotes);
        for (user_id, symbol) in &valuations.unpriced {
            warn!("Position {} held by {} not valued this cycle", symbol, user_id);
        }

        let mut summary = ValuationSummary {
            date,
            users_valued: 0,
            users_zero: 0,
            users_failed: Vec::new(),
            unpriced_positions: valuations.unpriced.clone(),
        };

        for (user_id, total) in valuations.totals {
            if total.is_zero() {
                summary.users_zero += 1;
                continue;
            }
            let holding = DailyHolding {
                user_id: user_id.clone(),
                date,
                total_value_inr: total,
                updated_at: Utc::now(),
            };
            match with_storage_deadline(
                self.deadlines.storage,
                "daily holding upsert",
                self.holdings.upsert_daily(holding),
            )
            .await
            {
                Ok(()) => summary.users_valued += 1,
                Err(e) => {
                    error!("Failed to store daily holding for {} on {}: {}", user_id, date, e);
                    summary.users_failed.push(user_id);
                }
            }
        }

        info!(
            "Valuation for {} complete: {} users valued, {} zero, {} failed",
            date,
            summary.users_valued,
            summary.users_zero,
            summary.users_failed.len()
        );
        Ok(ValuationCycleOutcome::Completed(summary))
    }
}
