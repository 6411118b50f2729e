/*
[INPUT]:  Error sources (HTTP transport, API payloads, serialization)
[OUTPUT]: Structured error types with retry classification
[POS]:    Error handling layer - unified error type for the adapter crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the Binance adapter.
#[derive(Error, Debug)]
pub enum BinanceError {
    /// HTTP request failed (connection, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Exchange returned an error payload
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Response body was not a well-formed exchange response
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A signed endpoint was called without credentials
    #[error("Missing API credentials for signed endpoint")]
    MissingCredentials,
}

impl BinanceError {
    /// Transport-level failures are inconclusive: the order may or may not
    /// have reached the exchange, so callers must not mutate state on them.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BinanceError::Http(_) | BinanceError::Malformed(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BinanceError::Http(err) if err.is_timeout())
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, BinanceError>;
