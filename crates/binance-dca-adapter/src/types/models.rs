/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed exchange metadata and account models
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::enums::Side;

/// Per-symbol trading constraints taken from the LOT_SIZE filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolConstraints {
    pub min_qty: Decimal,
    pub max_qty: Decimal,
    pub step_size: Decimal,
}

/// One filter entry under a symbol in /api/v3/exchangeInfo.
///
/// Binance ships a dozen filter kinds per symbol; only LOT_SIZE carries the
/// quantity constraints this crate needs, the rest deserialize to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "minQty", with = "rust_decimal::serde::str")]
        min_qty: Decimal,
        #[serde(rename = "maxQty", with = "rust_decimal::serde::str")]
        max_qty: Decimal,
        #[serde(rename = "stepSize", with = "rust_decimal::serde::str")]
        step_size: Decimal,
    },
    #[serde(other)]
    Other,
}

/// One tradable pair in /api/v3/exchangeInfo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// Response body of GET /api/v3/exchangeInfo, reduced to what the engine uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    /// The set of currently tradable pair identifiers.
    pub fn tradable_symbols(&self) -> BTreeSet<String> {
        self.symbols.iter().map(|s| s.symbol.clone()).collect()
    }

    /// LOT_SIZE constraints for one symbol, if the exchange lists it.
    pub fn constraints_for(&self, symbol: &str) -> Option<SymbolConstraints> {
        let info = self.symbols.iter().find(|s| s.symbol == symbol)?;
        info.filters.iter().find_map(|filter| match filter {
            SymbolFilter::LotSize {
                min_qty,
                max_qty,
                step_size,
            } => Some(SymbolConstraints {
                min_qty: *min_qty,
                max_qty: *max_qty,
                step_size: *step_size,
            }),
            SymbolFilter::Other => None,
        })
    }
}

/// One asset balance in GET /api/v3/account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}

/// Response body of GET /api/v3/account, reduced to what the engine uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountInformation {
    pub balances: Vec<AssetBalance>,
}

impl AccountInformation {
    /// Free balance of the asset a market order on `symbol` spends.
    ///
    /// A BUY spends the quote asset (the symbol's suffix), a SELL spends the
    /// base asset (the symbol's prefix). Returns None when no balance entry
    /// matches the symbol.
    pub fn free_balance_for(&self, symbol: &str, side: Side) -> Option<Decimal> {
        self.balances
            .iter()
            .find(|balance| match side {
                Side::Buy => symbol.ends_with(balance.asset.as_str()),
                Side::Sell => symbol.starts_with(balance.asset.as_str()),
            })
            .map(|balance| balance.free)
    }
}
