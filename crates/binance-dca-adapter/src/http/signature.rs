/*
[INPUT]:  Insertion-ordered request parameters and the API secret
[OUTPUT]: Canonical query string and HMAC-SHA256 hex signature
[POS]:    HTTP layer - request signing for authenticated endpoints
[UPDATE]: When changing signing algorithm or parameter serialization
*/

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Insertion-ordered request parameters.
///
/// The exchange verifies the signature against the exact byte sequence it
/// receives, so parameter order is a wire-compatibility invariant: callers
/// push parameters in the order the exchange documents and the canonical
/// form preserves it.
#[derive(Debug, Clone, Default)]
pub struct OrderedParams {
    entries: Vec<(&'static str, String)>,
}

impl OrderedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.entries.push((key, value.to_string()));
        self
    }

    /// `key=value` pairs joined by `&` with no trailing separator.
    pub fn canonical(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }
}

/// Signs canonical parameter strings with the account's API secret.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl RequestSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// HMAC-SHA256 over the canonical form, as a lowercase hex digest.
    pub fn sign(&self, params: &OrderedParams) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(params.canonical().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Canonical query with the signature appended last, ready to send.
    pub fn signed_query(&self, params: &OrderedParams) -> String {
        let signature = self.sign(params);
        let canonical = params.canonical();
        if canonical.is_empty() {
            format!("signature={signature}")
        } else {
            format!("{canonical}&signature={signature}")
        }
    }
}

// The secret must never appear in logs.
impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}
