/*
[INPUT]:  HTTP configuration (base URL, timeouts, credentials)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::http::error::{BinanceError, Result};
use crate::http::signature::{OrderedParams, RequestSigner};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Base URL for the Binance spot API
const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Header carrying the API key on authenticated requests
pub(crate) const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Credentials for authenticated requests.
///
/// The key travels in a request header; the secret is used only as the HMAC
/// key and is never serialized or logged.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn signer(&self) -> RequestSigner {
        RequestSigner::new(self.api_secret.clone())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Main HTTP client for the Binance spot API
#[derive(Debug)]
pub struct BinanceClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl BinanceClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client against a custom base URL (tests, mirrors)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            credentials: None,
        })
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Build a request builder for a public endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build a signed GET: canonical query plus signature in the URL,
    /// API key in the header.
    pub(crate) fn signed_get(&self, endpoint: &str, params: &OrderedParams) -> Result<RequestBuilder> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(BinanceError::MissingCredentials)?;

        let mut url = self.url(endpoint)?;
        url.set_query(Some(&credentials.signer().signed_query(params)));
        Ok(self
            .http_client
            .request(Method::GET, url)
            .header(API_KEY_HEADER, &credentials.api_key))
    }

    /// Build a signed POST: the canonical query plus signature becomes the
    /// form-encoded body, API key in the header.
    pub(crate) fn signed_post(&self, endpoint: &str, params: &OrderedParams) -> Result<RequestBuilder> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(BinanceError::MissingCredentials)?;

        let url = self.url(endpoint)?;
        Ok(self
            .http_client
            .request(Method::POST, url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(credentials.signer().signed_query(params)))
    }

    /// Send a request and decode the body into `T`.
    ///
    /// Non-2xx responses are still decoded as JSON where possible: the
    /// exchange returns `{code, msg}` payloads with 4xx statuses and those
    /// surface as `BinanceError::Api`. Bodies that are not JSON objects at
    /// all surface as `Malformed`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let value = self.send_value(builder).await?;

        if let Some(code) = value.get("code").and_then(Value::as_i64) {
            let message = value
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(BinanceError::Api { code, message });
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Send a request and return the raw decoded JSON body.
    pub(crate) async fn send_value(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|_| {
            BinanceError::Malformed(format!(
                "status {status}, undecodable body: {}",
                truncate_for_log(&body)
            ))
        })
    }
}

/// Current wall-clock time in epoch milliseconds, the exchange's timestamp unit.
pub(crate) fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn truncate_for_log(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(256)
        .map(|(idx, _)| idx)
        .unwrap_or(body.len());
    &body[..end]
}
