//! Background scheduler for the periodic valuation cycle.
//!
//! The first cycle runs immediately at startup, then once per interval.
//! Cycles never overlap: a tick that fires while a cycle runs waits for it.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use stocky_core::portfolio::{ValuationCycleOutcome, ValuationServiceTrait};

/// Handle to the running scheduler task.
pub struct ValuationScheduler {
    task: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

/// Starts the background valuation scheduler.
pub fn start_valuation_scheduler(
    service: Arc<dyn ValuationServiceTrait>,
    period: Duration,
) -> ValuationScheduler {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Valuation scheduler started ({}s interval)", period.as_secs());

        // First tick is immediate, subsequent ticks are `period` apart
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown_rx.changed() => break,
            }
            run_scheduled_valuation(service.as_ref()).await;
            if *shutdown_rx.borrow() {
                break;
            }
        }
        info!("Valuation scheduler stopped");
    });

    ValuationScheduler { task, shutdown_tx }
}

impl ValuationScheduler {
    /// Signals the scheduler to stop and waits up to `grace` for an
    /// in-flight cycle. A cycle still running after that is abandoned.
    pub async fn shutdown(mut self, grace: Duration) {
        let _ = self.shutdown_tx.send(true);
        match tokio::time::timeout(grace, &mut self.task).await {
            Ok(_) => debug!("Valuation scheduler drained"),
            Err(_) => {
                warn!(
                    "Valuation cycle still running after {}s grace, abandoning it",
                    grace.as_secs()
                );
                self.task.abort();
            }
        }
    }
}

/// Runs a single valuation cycle and logs its outcome.
async fn run_scheduled_valuation(service: &dyn ValuationServiceTrait) {
    debug!("Running scheduled valuation cycle...");

    match service.run_cycle().await {
        Ok(ValuationCycleOutcome::Skipped(reason)) => {
            info!("Valuation cycle skipped: {:?}", reason);
        }
        Ok(ValuationCycleOutcome::Completed(summary)) => {
            info!(
                "Valuation cycle for {} completed: {} users valued, {} at zero",
                summary.date, summary.users_valued, summary.users_zero
            );
            if !summary.users_failed.is_empty() {
                warn!(
                    "Valuation upsert failed for {} users: {:?}",
                    summary.users_failed.len(),
                    summary.users_failed
                );
            }
            if !summary.unpriced_positions.is_empty() {
                debug!(
                    "Positions without a refreshed quote: {:?}",
                    summary.unpriced_positions
                );
            }
        }
        Err(e) => {
            error!("Valuation cycle failed: {}", e);
        }
    }
}
