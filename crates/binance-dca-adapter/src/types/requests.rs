/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;

use super::enums::Side;

/// A market order as the engine submits it.
///
/// `amount` is interpreted by the exchange according to the side: base-asset
/// units for SELL (`quantity`), quote-asset spend for BUY (`quoteOrderQty`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrder {
    pub symbol: String,
    pub side: Side,
    pub amount: Decimal,
}

impl MarketOrder {
    pub fn new(symbol: impl Into<String>, side: Side, amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            amount,
        }
    }

    /// The quantity parameter name the exchange expects for this side.
    pub fn quantity_field(&self) -> &'static str {
        match self.side {
            Side::Sell => "quantity",
            Side::Buy => "quoteOrderQty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_field_per_side() {
        let sell = MarketOrder::new("ETHBTC", Side::Sell, Decimal::ONE);
        let buy = MarketOrder::new("ETHBTC", Side::Buy, Decimal::ONE);
        assert_eq!(sell.quantity_field(), "quantity");
        assert_eq!(buy.quantity_field(), "quoteOrderQty");
    }
}
