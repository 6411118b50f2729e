/*
[INPUT]:  Requested amount (fixed or MAX), live metadata and balances
[OUTPUT]: Step-aligned tradable quantity
[POS]:    Execution layer - quantity normalization
[UPDATE]: When exchange precision rules change
*/

use crate::config::Amount;
use anyhow::{Context as _, Result, anyhow};
use binance_dca_adapter::{BinanceClient, Side};
use rust_decimal::Decimal;

/// Truncate `amount` down to the nearest multiple of `step`.
///
/// Never rounds up: exceeding exchange precision must never risk spending
/// more than requested.
pub fn truncate_to_step(amount: Decimal, step: Decimal) -> Decimal {
    if step <= Decimal::ZERO {
        return amount;
    }
    amount - (amount % step)
}

/// Resolves a rule's requested amount into a quantity the exchange accepts.
///
/// Metadata and balances are fetched fresh on every call; exchange-side
/// limit changes and concurrent account activity make cached values stale.
pub struct QuantityNormalizer<'a> {
    client: &'a BinanceClient,
}

impl<'a> QuantityNormalizer<'a> {
    pub fn new(client: &'a BinanceClient) -> Self {
        Self { client }
    }

    /// `normalize(symbol, side, amount) -> step-aligned quantity`.
    ///
    /// MAX resolves against the free balance of the asset the order spends:
    /// the quote asset for BUY, the base asset for SELL. Min/max bounds are
    /// left to the exchange to enforce; only step alignment happens here.
    pub async fn normalize(&self, symbol: &str, side: Side, amount: &Amount) -> Result<Decimal> {
        let info = self
            .client
            .exchange_info()
            .await
            .context("fetch exchange metadata")?;
        let constraints = info
            .constraints_for(symbol)
            .ok_or_else(|| anyhow!("no LOT_SIZE constraints published for {symbol}"))?;

        let requested = match amount {
            Amount::Fixed(value) => *value,
            Amount::Max => {
                let account = self
                    .client
                    .account()
                    .await
                    .context("fetch account balances")?;
                account
                    .free_balance_for(symbol, side)
                    .unwrap_or(Decimal::ZERO)
            }
        };

        Ok(truncate_to_step(requested, constraints.step_size))
    }
}
