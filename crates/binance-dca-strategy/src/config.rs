/*
[INPUT]:  JSON rule file ({"tickers": [...]})
[OUTPUT]: Typed recurring-purchase rule book
[POS]:    Configuration layer - rule definitions
[UPDATE]: When the rule file schema changes
*/

use binance_dca_adapter::Side;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The full rule file: a list of recurring-purchase rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    pub tickers: Vec<PurchaseRule>,
}

/// One recurring-order definition, in the rule file's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRule {
    pub symbol: String,
    #[serde(rename = "buy_or_sell")]
    pub side: Side,
    #[serde(rename = "transaction_amount")]
    pub amount: Amount,
    #[serde(rename = "time_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(rename = "last_purchase_time")]
    pub last_executed_at: f64,
}

impl PurchaseRule {
    /// A rule runs only once its interval has fully elapsed (strict).
    pub fn is_due(&self, now: f64) -> bool {
        now - self.last_executed_at > self.interval_seconds as f64
    }
}

/// Requested amount: a fixed quantity, or all currently available funds.
///
/// Decided once at configuration-load time; the wire form is a JSON number
/// or the literal string "MAX" and round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Fixed(Decimal),
    Max,
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Fixed(value) => {
                let number = value
                    .to_f64()
                    .ok_or_else(|| serde::ser::Error::custom("amount not representable"))?;
                serializer.serialize_f64(number)
            }
            Amount::Max => serializer.serialize_str("MAX"),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a non-negative number or the string \"MAX\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
                Ok(Amount::Fixed(Decimal::from(value)))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
                Ok(Amount::Fixed(Decimal::from(value)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
                Decimal::try_from(value)
                    .map(Amount::Fixed)
                    .map_err(|_| E::custom(format!("amount out of range: {value}")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
                if value == "MAX" {
                    Ok(Amount::Max)
                } else {
                    Err(E::custom(format!("only allowed string value is MAX, got: {value}")))
                }
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
