//! # Money Module
//!
//! Provides the `Money` and `Quantity` types for prices, costs and serving
//! sizes.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A glass of wine is priced as a fraction of a bottle:                   │
//! │    £9.00 × 125/750 must land on the SAME penny on every terminal        │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal (28 significant digits, base 10)            │
//! │    Every rounding step is explicit and names its direction              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! - [`Money::round_up`] rounds AWAY from zero (never down) to `dp` places.
//! - [`Money::quantize`] changes the number of stored places. Widening
//!   (1.6 → 1.60) is exact; narrowing rounds half away from zero.
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use till_core::money::Money;
//!
//! let bottle = Money::new(dec!(9.00));
//! let glass = (bottle * (dec!(125.0) / dec!(750.0))).round_up(1).quantize(2);
//! assert_eq!(glass.to_string(), "£1.60");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// Decimal places of a finished currency amount.
pub const CURRENCY_DP: u32 = 2;

/// Decimal places of the coarse "round in the house's favour" step.
pub const COARSE_DP: u32 = 1;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value (price or cost) held as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal, not cents**: serving sizes divide prices by 750, 568, ...;
///   intermediate values need more than two places before rounding
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serde transparent**: serialized as a decimal string, e.g. `"1.60"`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  StockLine price ──► SaleLine.price ──► Modifier ──► transaction        │
/// │                                                                         │
/// │  PriceLookup.price / altprice1..3 ──► Wine modifier ──► SaleLine.price  │
/// │                                                                         │
/// │  Delivery cost (ex VAT) ──► PriceGuess ──► suggested retail price       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero (at any scale: 0, 0.0 and 0.00 are all zero).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Number of decimal places currently stored.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    /// Rounds away from zero to `dp` decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::new(dec!(1.41)).round_up(1), Money::new(dec!(1.5)));
    /// assert_eq!(Money::new(dec!(1.40)).round_up(1), Money::new(dec!(1.4)));
    /// ```
    #[must_use]
    pub fn round_up(&self, dp: u32) -> Self {
        Money(self.0.round_dp_with_strategy(dp, RoundingStrategy::AwayFromZero))
    }

    /// Re-expresses the value with exactly `dp` decimal places.
    ///
    /// Widening never changes the value. Narrowing rounds half away from zero.
    #[must_use]
    pub fn quantize(&self, dp: u32) -> Self {
        let mut amount = self.0;
        amount.rescale(dp);
        Money(amount)
    }

    /// Half of the amount, exact.
    #[must_use]
    pub fn halve(&self) -> Self {
        Money(self.0 / Decimal::TWO)
    }

    /// Divides by `divisor`, returning `None` for a zero divisor or overflow.
    pub fn checked_div(&self, divisor: Decimal) -> Option<Self> {
        self.0.checked_div(divisor).map(Money)
    }

    /// Scales by `factor`, returning `None` on overflow.
    pub fn checked_mul(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Adds `other`, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A quantity of stock in sale units (pints, ml, measures, items...).
///
/// Fractions are normal: half a pint is `0.5`, a 125ml glass from a line
/// measured in ml is `125.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Wraps an exact decimal quantity.
    #[inline]
    pub const fn new(qty: Decimal) -> Self {
        Quantity(qty)
    }

    /// A single sale unit; the starting quantity of every sale line.
    #[inline]
    pub const fn one() -> Self {
        Quantity(Decimal::ONE)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Scales by `factor`, returning `None` on overflow.
    pub fn checked_mul(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Quantity)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::one()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as pounds to the penny, e.g. `£1.60`.
///
/// ## Note
/// For debugging and operator messages. Values with more than two places
/// are rounded for display only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}£{:.2}", sign, self.0.abs())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl FromStr for Quantity {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Quantity)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl From<Decimal> for Quantity {
    fn from(qty: Decimal) -> Self {
        Quantity(qty)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Scaling by a factor (case size, serving ratio, markup).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Mul<Decimal> for Quantity {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Quantity(self.0 * factor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
