/*
[INPUT]:  No parameters (public market metadata)
[OUTPUT]: Exchange metadata (tradable symbols, LOT_SIZE constraints)
[POS]:    HTTP layer - public endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use crate::http::{BinanceClient, Result};
use crate::types::ExchangeInfo;
use reqwest::Method;

impl BinanceClient {
    /// Connectivity check
    ///
    /// GET /api/v3/ping
    pub async fn ping(&self) -> Result<()> {
        let builder = self.request(Method::GET, "/api/v3/ping")?;
        // The body is an empty object; only a decodable response matters.
        self.send_value(builder).await?;
        Ok(())
    }

    /// Fetch full exchange metadata: tradable symbols and per-symbol filters
    ///
    /// GET /api/v3/exchangeInfo
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        let builder = self.request(Method::GET, "/api/v3/exchangeInfo")?;
        self.send_json(builder).await
    }
}
