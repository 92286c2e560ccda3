//! # Sale Line
//!
//! The working value a modifier transforms.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Register UI picks a key                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleLine::from_stock_line / from_price_lookup   qty = 1                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  modifier::apply(&modifier, &sale)  ──► Err(Incompatible) ──► discard   │
//! │       │                                  (sale untouched)               │
//! │       ▼                                                                 │
//! │  Ok(new SaleLine) ──► handed to the transaction                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale line is never persisted and never shared between terminals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::modifier::Capability;
use crate::money::{Money, Quantity};
use crate::types::{PriceLookup, StockLine, StockType};

/// What a sale line is selling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaleSource {
    StockLine(StockLine),
    PriceLookup(PriceLookup),
}

impl SaleSource {
    /// The modifier capability needed to act on this source.
    pub fn capability(&self) -> Capability {
        match self {
            SaleSource::StockLine(_) => Capability::StockLine,
            SaleSource::PriceLookup(_) => Capability::PriceLookup,
        }
    }
}

/// A proposed sale line.
///
/// ## Fields
/// - `qty`: sale units, starts at 1
/// - `price`: unit price; `None` means "not known yet, the sale pipeline
///   prices it later", and rules leave it alone
/// - `description`: text for the receipt and the register display
/// - `source`: the stock line or price lookup being sold; read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    #[ts(as = "String")]
    pub qty: Quantity,

    #[ts(as = "Option<String>")]
    pub price: Option<Money>,

    pub description: String,

    source: SaleSource,
}

impl SaleLine {
    /// A single unit from a stock line, described by its stock type.
    pub fn from_stock_line(line: StockLine, price: Option<Money>) -> Self {
        SaleLine {
            qty: Quantity::one(),
            price,
            description: line.stocktype.to_string(),
            source: SaleSource::StockLine(line),
        }
    }

    /// A single price lookup at its base price.
    pub fn from_price_lookup(plu: PriceLookup) -> Self {
        SaleLine {
            qty: Quantity::one(),
            price: plu.price,
            description: plu.description.clone(),
            source: SaleSource::PriceLookup(plu),
        }
    }

    /// The item being sold.
    #[inline]
    pub fn source(&self) -> &SaleSource {
        &self.source
    }

    /// The stock type, for stock line sales.
    pub fn stocktype(&self) -> Option<&StockType> {
        match &self.source {
            SaleSource::StockLine(line) => Some(&line.stocktype),
            SaleSource::PriceLookup(_) => None,
        }
    }

    /// Total for the line, when the price is known.
    pub fn total(&self) -> Option<Money> {
        self.price.map(|price| price * self.qty.value())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
