//! # Domain Types
//!
//! Read-only views of the stock data the rule engine inspects. The
//! database layer owns these records; modifiers and the price guess only
//! look at them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockLine     │──►│   StockType     │──►│   Department    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  manufacturer   │   │  id             │       │
//! │  │  name           │   │  name           │   │  description    │       │
//! │  │  linetype       │   │  department ────┼──►│  vat (VatBand)  │       │
//! │  └─────────────────┘   │  unit ──────┐   │   └────────┬────────┘       │
//! │                        └─────────────┼───┘            ▼                 │
//! │                                      ▼         ┌─────────────────┐     │
//! │  ┌─────────────────┐   ┌─────────────────┐     │   VatRevision   │     │
//! │  │  PriceLookup    │   │   StockUnit     │     │  effective_from │     │
//! │  │  dept_id        │   │  name           │     │  rate (%)       │     │
//! │  │  price          │   │  base_units_    │     └─────────────────┘     │
//! │  │  altprice1..3   │   │   per_sale_unit │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// VAT
// =============================================================================

/// Converts an amount exclusive of VAT into the amount a customer pays.
///
/// This is the seam to whatever owns VAT rates. [`VatRevision`] is the
/// in-crate implementation.
pub trait ExcToInc {
    /// Returns `amount` with VAT added, or `None` if it does not fit in a
    /// decimal.
    fn exc_to_inc(&self, amount: Money) -> Option<Money>;
}

/// One dated revision of a VAT band.
///
/// `rate` is a percentage: `20.0` means 20%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRevision {
    /// First day this rate applies.
    #[ts(as = "String")]
    pub effective_from: NaiveDate,

    /// Rate as a percentage.
    #[ts(as = "String")]
    pub rate: Decimal,
}

impl VatRevision {
    pub fn new(effective_from: NaiveDate, rate: Decimal) -> Self {
        VatRevision {
            effective_from,
            rate,
        }
    }
}

impl ExcToInc for VatRevision {
    /// `amount × (100 + rate) / 100`, exact. No rounding happens here;
    /// callers round in the direction their policy demands.
    fn exc_to_inc(&self, amount: Money) -> Option<Money> {
        let factor = Decimal::ONE_HUNDRED.checked_add(self.rate)?;
        amount
            .checked_mul(factor)?
            .checked_div(Decimal::ONE_HUNDRED)
    }
}

/// A VAT band (e.g. "A" standard rated) and its rate history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatBand {
    /// Band code as printed on receipts.
    pub band: String,

    /// Rate history in any order.
    pub revisions: Vec<VatRevision>,
}

impl VatBand {
    /// A band with a single rate that has always applied.
    pub fn flat(band: impl Into<String>, rate: Decimal) -> Self {
        VatBand {
            band: band.into(),
            revisions: vec![VatRevision::new(NaiveDate::MIN, rate)],
        }
    }

    /// The revision in force on `date`: the latest one that started on or
    /// before it.
    pub fn at(&self, date: NaiveDate) -> Option<&VatRevision> {
        self.revisions
            .iter()
            .filter(|rev| rev.effective_from <= date)
            .max_by_key(|rev| rev.effective_from)
    }

    /// The revision in force today.
    pub fn current(&self) -> Option<&VatRevision> {
        self.at(Utc::now().date_naive())
    }
}

// =============================================================================
// Department
// =============================================================================

/// A sales department. Every stock type belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Department {
    pub id: i32,
    pub description: String,
    pub vat: VatBand,
}

impl Department {
    pub fn new(id: i32, description: impl Into<String>, vat: VatBand) -> Self {
        Department {
            id,
            description: description.into(),
            vat,
        }
    }
}

// =============================================================================
// Stock Unit
// =============================================================================

/// The measure stock is sold in.
///
/// `base_units_per_sale_unit` says how many base units (usually ml) make
/// one sale unit: a unit named "ml" with 568 is an imperial pint priced
/// per pint but counted in millilitres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockUnit {
    pub name: String,
    pub base_units_per_sale_unit: u32,
}

impl StockUnit {
    pub fn new(name: impl Into<String>, base_units_per_sale_unit: u32) -> Self {
        StockUnit {
            name: name.into(),
            base_units_per_sale_unit,
        }
    }

    /// True when the unit has this name and this many base units per sale unit.
    pub fn is(&self, name: &str, base_units_per_sale_unit: u32) -> bool {
        self.name == name && self.base_units_per_sale_unit == base_units_per_sale_unit
    }
}

// =============================================================================
// Stock Type
// =============================================================================

/// A kind of stock: "Club Mate Regular 330ml", "Dark Star Hophead", ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockType {
    pub manufacturer: String,
    pub name: String,
    pub department: Department,
    pub unit: StockUnit,
}

impl StockType {
    pub fn new(
        manufacturer: impl Into<String>,
        name: impl Into<String>,
        department: Department,
        unit: StockUnit,
    ) -> Self {
        StockType {
            manufacturer: manufacturer.into(),
            name: name.into(),
            department,
            unit,
        }
    }

    #[inline]
    pub fn dept_id(&self) -> i32 {
        self.department.id
    }
}

/// Full name as shown on the register: manufacturer then name.
impl fmt::Display for StockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.name)
    }
}

// =============================================================================
// Stock Line
// =============================================================================

/// How a stock line draws down stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// One stock item on sale at a time (a keg on a pump).
    Regular,
    /// Counted items with a display capacity (bottles in a fridge).
    Display,
    /// Sold by measure from whatever stock of the type is open (wine by the glass).
    Continuous,
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineType::Regular => write!(f, "regular"),
            LineType::Display => write!(f, "display"),
            LineType::Continuous => write!(f, "continuous"),
        }
    }
}

/// A sellable line on the till keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLine {
    pub id: i32,
    pub name: String,
    pub linetype: LineType,
    pub stocktype: StockType,
}

impl StockLine {
    pub fn new(id: i32, name: impl Into<String>, linetype: LineType, stocktype: StockType) -> Self {
        StockLine {
            id,
            name: name.into(),
            linetype,
            stocktype,
        }
    }
}

// =============================================================================
// Price Lookup
// =============================================================================

/// Names one of a price lookup's price fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PluPriceField {
    Price,
    #[serde(rename = "altprice1")]
    AltPrice1,
    #[serde(rename = "altprice2")]
    AltPrice2,
    #[serde(rename = "altprice3")]
    AltPrice3,
}

impl fmt::Display for PluPriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluPriceField::Price => write!(f, "price"),
            PluPriceField::AltPrice1 => write!(f, "altprice1"),
            PluPriceField::AltPrice2 => write!(f, "altprice2"),
            PluPriceField::AltPrice3 => write!(f, "altprice3"),
        }
    }
}

/// A standalone priced item not tied to stock (a glass of house wine, a
/// raffle ticket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceLookup {
    pub id: i32,
    pub description: String,
    pub dept_id: i32,
    #[ts(as = "Option<String>")]
    pub price: Option<Money>,
    #[ts(as = "Option<String>")]
    pub altprice1: Option<Money>,
    #[ts(as = "Option<String>")]
    pub altprice2: Option<Money>,
    #[ts(as = "Option<String>")]
    pub altprice3: Option<Money>,
}

impl PriceLookup {
    /// A price lookup with only its base price set.
    pub fn new(id: i32, description: impl Into<String>, dept_id: i32, price: Option<Money>) -> Self {
        PriceLookup {
            id,
            description: description.into(),
            dept_id,
            price,
            altprice1: None,
            altprice2: None,
            altprice3: None,
        }
    }

    /// Reads the named price field.
    pub fn price_field(&self, field: PluPriceField) -> Option<Money> {
        match field {
            PluPriceField::Price => self.price,
            PluPriceField::AltPrice1 => self.altprice1,
            PluPriceField::AltPrice2 => self.altprice2,
            PluPriceField::AltPrice3 => self.altprice3,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
