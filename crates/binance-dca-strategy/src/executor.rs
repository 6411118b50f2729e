/*
[INPUT]:  One purchase rule and live account state
[OUTPUT]: Classified transaction outcome for a single order attempt
[POS]:    Execution layer - order submission
[UPDATE]: When the submission flow or pre-checks change
*/

use crate::config::PurchaseRule;
use crate::normalize::QuantityNormalizer;
use anyhow::{Context as _, Result};
use binance_dca_adapter::{BinanceClient, MarketOrder, TransactionOutcome};
use rust_decimal::Decimal;
use tracing::debug;

/// Builds, signs, submits one market order and classifies the result.
pub struct OrderExecutor<'a> {
    client: &'a BinanceClient,
}

impl<'a> OrderExecutor<'a> {
    pub fn new(client: &'a BinanceClient) -> Self {
        Self { client }
    }

    /// `execute(rule) -> TransactionOutcome`.
    ///
    /// The quantity is recomputed here with fresh metadata and balances, and
    /// free funds are re-checked immediately before submission: a shortfall
    /// (including a quantity truncated to zero) returns a local
    /// `InsufficientFunds` outcome without a network order call. Errors are
    /// transport-level and inconclusive; the caller must not mutate rule
    /// state on them.
    pub async fn execute(&self, rule: &PurchaseRule) -> Result<TransactionOutcome> {
        let normalizer = QuantityNormalizer::new(self.client);
        let quantity = normalizer
            .normalize(&rule.symbol, rule.side, &rule.amount)
            .await?;

        let account = self
            .client
            .account()
            .await
            .context("pre-submission funds check")?;
        let available = account
            .free_balance_for(&rule.symbol, rule.side)
            .unwrap_or(Decimal::ZERO);

        if quantity.is_zero() || available < quantity {
            debug!(
                symbol = %rule.symbol,
                side = %rule.side,
                requested = %quantity,
                %available,
                "skipping submission, insufficient funds"
            );
            return Ok(TransactionOutcome::InsufficientFunds {
                requested: quantity,
                available,
            });
        }

        let order = MarketOrder::new(rule.symbol.clone(), rule.side, quantity);
        self.client
            .place_market_order(&order)
            .await
            .context("submit market order")
    }
}
