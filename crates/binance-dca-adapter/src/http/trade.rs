/*
[INPUT]:  Market orders with signed form-encoded payloads
[OUTPUT]: Classified transaction outcomes
[POS]:    HTTP layer - trading endpoint (auth + body signature)
[UPDATE]: When changing the order payload or outcome classification
*/

use crate::http::client::timestamp_ms;
use crate::http::signature::OrderedParams;
use crate::http::{BinanceClient, BinanceError, Result};
use crate::types::{MarketOrder, TransactionOutcome};
use tracing::info;

impl BinanceClient {
    /// Submit a market order and classify the exchange's answer.
    ///
    /// Signed POST /api/v3/order. The parameter order is a wire invariant:
    /// symbol, side, type, timestamp, then the one quantity field the side
    /// requires. A transport failure is returned as an error (inconclusive);
    /// every decodable response, success status or not, classifies into a
    /// `TransactionOutcome`.
    pub async fn place_market_order(&self, order: &MarketOrder) -> Result<TransactionOutcome> {
        let timestamp = timestamp_ms();
        let mut params = OrderedParams::new();
        params
            .push("symbol", &order.symbol)
            .push("side", order.side)
            .push("type", "MARKET")
            .push("timestamp", timestamp)
            .push(order.quantity_field(), order.amount);

        info!(
            symbol = %order.symbol,
            side = %order.side,
            amount = %order.amount,
            timestamp,
            "submitting market order"
        );

        let builder = self.signed_post("/api/v3/order", &params)?;
        match self.send_value(builder).await {
            Ok(body) => Ok(TransactionOutcome::classify(&body)),
            Err(BinanceError::Malformed(detail)) => {
                Ok(TransactionOutcome::Malformed { detail })
            }
            Err(err) => Err(err),
        }
    }
}
