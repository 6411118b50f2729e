/*
[INPUT]:  Raw rule document and the tradable-symbol set
[OUTPUT]: Typed rule book, or an aggregated validation report
[POS]:    Configuration layer - startup rule validation
[UPDATE]: When rule constraints change
*/

use crate::config::RuleBook;
use serde_json::Value;
use std::collections::BTreeSet;

/// Every violation found in a rule document, one line per violation.
///
/// Validation is fail-closed: a single bad rule aborts startup, and the
/// report names every problem at once so an operator can fix the whole file
/// in one pass.
#[derive(Debug)]
pub struct ValidationReport {
    violations: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    fn push(&mut self, symbol: &str, message: impl AsRef<str>) {
        self.violations
            .push(format!("rule {symbol}: {}", message.as_ref()));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.violations.join("\n"))
    }
}

impl std::error::Error for ValidationReport {}

/// Validate a raw rule document against the currently tradable symbols and,
/// if clean, produce the typed rule book.
pub fn validate_document(
    doc: &Value,
    tradable: &BTreeSet<String>,
) -> Result<RuleBook, ValidationReport> {
    let mut report = ValidationReport::new();

    let Some(tickers) = doc.get("tickers").and_then(Value::as_array) else {
        report.push("<document>", "missing top-level \"tickers\" array");
        return Err(report);
    };

    for (index, ticker) in tickers.iter().enumerate() {
        let fallback = format!("<rule #{index}>");
        let symbol = match ticker.get("symbol") {
            Some(Value::String(symbol)) => {
                if !tradable.contains(symbol) {
                    report.push(symbol, format!("symbol {symbol} is not tradable on the exchange"));
                }
                symbol.clone()
            }
            _ => {
                report.push(&fallback, "ticker symbol must be a string");
                fallback
            }
        };

        match ticker.get("buy_or_sell").and_then(Value::as_str) {
            Some("BUY") | Some("SELL") => {}
            Some(other) => report.push(
                &symbol,
                format!("transaction type {other} is not allowed; set BUY or SELL"),
            ),
            None => report.push(&symbol, "buy_or_sell must be the string BUY or SELL"),
        }

        match ticker.get("transaction_amount") {
            Some(Value::Number(amount)) => {
                if amount.as_f64().is_some_and(|value| value < 0.0) {
                    report.push(&symbol, "transaction amount cannot be negative");
                }
            }
            Some(Value::String(text)) => {
                if text != "MAX" {
                    report.push(&symbol, "only allowed string value for transaction amount is MAX");
                }
            }
            _ => report.push(&symbol, "transaction amount must be a non-negative number or MAX"),
        }

        match ticker.get("time_interval_seconds") {
            Some(Value::Number(interval)) => {
                if interval.as_u64().is_none() {
                    report.push(&symbol, "time interval must be a non-negative integer");
                }
            }
            _ => report.push(&symbol, "time interval must be a non-negative integer"),
        }

        match ticker.get("last_purchase_time") {
            Some(Value::Number(_)) => {}
            _ => report.push(&symbol, "last purchase time must be a number (epoch seconds)"),
        }
    }

    if !report.is_empty() {
        return Err(report);
    }

    serde_json::from_value(doc.clone()).map_err(|err| {
        // Reached only if the structural checks above and the serde model
        // ever disagree.
        let mut report = ValidationReport::new();
        report.push("<document>", format!("rule file failed to decode: {err}"));
        report
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tradable() -> BTreeSet<String> {
        ["BTCUSDT", "ETHBTC"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn rule(symbol: &str) -> Value {
        json!({
            "symbol": symbol,
            "buy_or_sell": "BUY",
            "transaction_amount": 25.0,
            "time_interval_seconds": 86400,
            "last_purchase_time": 0.0
        })
    }

    #[test]
    fn test_clean_document_produces_rule_book() {
        let doc = json!({"tickers": [rule("BTCUSDT"), rule("ETHBTC")]});
        let book = validate_document(&doc, &tradable()).expect("valid document");
        assert_eq!(book.tickers.len(), 2);
    }

    #[test]
    fn test_unknown_symbol_names_the_rule() {
        let doc = json!({"tickers": [rule("DOGEMOON")]});
        let report = validate_document(&doc, &tradable()).unwrap_err();
        assert!(report.to_string().contains("DOGEMOON"));
        assert!(report.to_string().contains("not tradable"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut bad = rule("BTCUSDT");
        bad["transaction_amount"] = json!(-5.0);
        let doc = json!({"tickers": [bad]});
        let report = validate_document(&doc, &tradable()).unwrap_err();
        assert!(report.to_string().contains("cannot be negative"));
    }

    #[test]
    fn test_invalid_direction_rejected() {
        let mut bad = rule("BTCUSDT");
        bad["buy_or_sell"] = json!("HOLD");
        let doc = json!({"tickers": [bad]});
        let report = validate_document(&doc, &tradable()).unwrap_err();
        assert!(report.to_string().contains("HOLD"));
    }

    #[test]
    fn test_non_integer_interval_rejected() {
        let mut bad = rule("BTCUSDT");
        bad["time_interval_seconds"] = json!(10.5);
        let doc = json!({"tickers": [bad]});
        let report = validate_document(&doc, &tradable()).unwrap_err();
        assert!(report.to_string().contains("non-negative integer"));
    }

    #[test]
    fn test_non_numeric_timestamp_rejected() {
        let mut bad = rule("BTCUSDT");
        bad["last_purchase_time"] = json!("yesterday");
        let doc = json!({"tickers": [bad]});
        let report = validate_document(&doc, &tradable()).unwrap_err();
        assert!(report.to_string().contains("epoch seconds"));
    }

    #[test]
    fn test_violations_aggregate_across_rules() {
        let mut first = rule("DOGEMOON");
        first["transaction_amount"] = json!(-1);
        let mut second = rule("ETHBTC");
        second["buy_or_sell"] = json!("HODL");

        let doc = json!({"tickers": [first, second]});
        let report = validate_document(&doc, &tradable()).unwrap_err();

        let rendered = report.to_string();
        assert!(rendered.contains("DOGEMOON"));
        assert!(rendered.contains("ETHBTC"));
        assert!(report.violations().len() >= 3);
    }

    #[test]
    fn test_missing_tickers_array() {
        let doc = json!({"rules": []});
        let report = validate_document(&doc, &tradable()).unwrap_err();
        assert!(report.to_string().contains("tickers"));
    }

    #[test]
    fn test_max_sentinel_accepted() {
        let mut max_rule = rule("ETHBTC");
        max_rule["transaction_amount"] = json!("MAX");
        let doc = json!({"tickers": [max_rule]});
        assert!(validate_document(&doc, &tradable()).is_ok());
    }
}
