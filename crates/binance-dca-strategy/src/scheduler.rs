/*
[INPUT]:  Validated rule book, exchange client, cancellation token
[OUTPUT]: Recurring order execution with per-fill state persistence
[POS]:    Execution layer - the recurring scheduling loop
[UPDATE]: When eligibility or shutdown semantics change
*/

use crate::config::RuleBook;
use crate::executor::OrderExecutor;
use crate::state::StateStore;
use anyhow::Result;
use binance_dca_adapter::{BinanceClient, TransactionOutcome};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives the recurring cycle: scan all rules, execute the due ones, sleep
/// one quantum, repeat until cancelled.
///
/// Evaluation is sequential; rules share no mutable state besides the store
/// and the loop is the only writer. Cancellation is observed between rule
/// evaluations and between passes, never mid-submission, so an in-flight
/// fill is always persisted before exit.
pub struct SchedulerLoop {
    client: BinanceClient,
    store: StateStore,
    book: RuleBook,
    quantum: Duration,
    shutdown: CancellationToken,
}

impl SchedulerLoop {
    pub fn new(
        client: BinanceClient,
        store: StateStore,
        book: RuleBook,
        quantum: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            client,
            store,
            book,
            quantum,
            shutdown,
        }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.book
    }

    /// Run until the cancellation token fires.
    pub async fn run(mut self) -> Result<()> {
        info!(rule_count = self.book.tickers.len(), "scheduler started");

        while !self.shutdown.is_cancelled() {
            self.scan_once(epoch_seconds()).await?;

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.quantum) => {}
            }
        }

        info!("scheduler stopped");
        Ok(())
    }

    /// One scanning pass over all rules at the given wall-clock time.
    ///
    /// Public so tests can single-step the loop deterministically instead of
    /// sleeping against real time.
    pub async fn scan_once(&mut self, now: f64) -> Result<()> {
        for index in 0..self.book.tickers.len() {
            if self.shutdown.is_cancelled() {
                break;
            }

            let rule = self.book.tickers[index].clone();
            if !rule.is_due(now) {
                debug!(symbol = %rule.symbol, "interval not elapsed, skipping");
                continue;
            }

            info!(symbol = %rule.symbol, side = %rule.side, "rule due, executing");
            let executor = OrderExecutor::new(&self.client);
            match executor.execute(&rule).await {
                Ok(TransactionOutcome::Filled { .. }) => {
                    self.book.tickers[index].last_executed_at = now;
                    self.store.persist(&self.book).await?;
                    info!(symbol = %rule.symbol, side = %rule.side, "order filled, state persisted");
                }
                Ok(outcome) => {
                    warn!(
                        symbol = %rule.symbol,
                        outcome = outcome.label(),
                        detail = ?outcome,
                        "order did not fill; will retry next eligible cycle"
                    );
                }
                Err(err) => {
                    warn!(
                        symbol = %rule.symbol,
                        error = %err,
                        "execution inconclusive; will retry next eligible cycle"
                    );
                }
            }
        }

        Ok(())
    }
}

/// Current wall-clock time in fractional epoch seconds, the rule file's unit.
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
