/*
[INPUT]:  Raw order-endpoint response bodies
[OUTPUT]: Classified transaction outcomes
[POS]:    Data layer - outcome classification for submitted orders
[UPDATE]: When the exchange response contract changes
*/

use rust_decimal::Decimal;
use serde_json::Value;

/// Classified result of one order submission.
///
/// Only `Filled` may advance a rule's last-execution timestamp; every other
/// variant leaves persisted state untouched so the next eligible cycle
/// retries naturally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Exchange confirmed the order fully executed.
    Filled { response: Value },
    /// Exchange accepted the order but did not report it fully filled.
    NotFilled { status: Option<String> },
    /// Exchange returned an error payload.
    Rejected { code: i64, message: String },
    /// Response was not a well-formed exchange response object.
    Malformed { detail: String },
    /// Local pre-submission funds check failed; no order was sent.
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
}

impl TransactionOutcome {
    /// Classify a decoded order-endpoint response body.
    pub fn classify(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return TransactionOutcome::Malformed {
                detail: format!("expected JSON object, got: {value}"),
            };
        };

        if let Some(code) = object.get("code").and_then(Value::as_i64) {
            let message = object
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return TransactionOutcome::Rejected { code, message };
        }

        match object.get("status").and_then(Value::as_str) {
            Some("FILLED") => TransactionOutcome::Filled {
                response: value.clone(),
            },
            status => TransactionOutcome::NotFilled {
                status: status.map(str::to_string),
            },
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, TransactionOutcome::Filled { .. })
    }

    /// Short label for log output.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionOutcome::Filled { .. } => "filled",
            TransactionOutcome::NotFilled { .. } => "not_filled",
            TransactionOutcome::Rejected { .. } => "rejected",
            TransactionOutcome::Malformed { .. } => "malformed",
            TransactionOutcome::InsufficientFunds { .. } => "insufficient_funds",
        }
    }
}
