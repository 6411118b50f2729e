/*
[INPUT]:  API credentials (key header + HMAC signature)
[OUTPUT]: Account balances
[POS]:    HTTP layer - signed user-data endpoints
[UPDATE]: When adding new signed endpoints or changing query parameters
*/

use crate::http::client::timestamp_ms;
use crate::http::signature::OrderedParams;
use crate::http::{BinanceClient, Result};
use crate::types::AccountInformation;

impl BinanceClient {
    /// Fetch account balances
    ///
    /// Signed GET /api/v3/account; the only parameter is the millisecond
    /// timestamp, signed and sent as the query string.
    pub async fn account(&self) -> Result<AccountInformation> {
        let mut params = OrderedParams::new();
        params.push("timestamp", timestamp_ms());

        let builder = self.signed_get("/api/v3/account", &params)?;
        self.send_json(builder).await
    }
}
