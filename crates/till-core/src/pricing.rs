//! # Price Guess
//!
//! Suggests a retail price for newly delivered stock.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cost (ex VAT, per delivered stock unit)                                │
//! │       │                                                                 │
//! │       ▼   × multiplier  ÷ unit size        department policy            │
//! │  marked-up price per sale unit (ex VAT)                                 │
//! │       │                                                                 │
//! │       ▼   VatRevision::exc_to_inc          band's revision on the day   │
//! │  inc-VAT price                                                          │
//! │       │                                                                 │
//! │       ▼   round UP to 1dp                  the only rounding step       │
//! │  suggestion ──► max(floor, suggestion)     if the policy has a floor    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result only prefills the stock-intake form. A department with no
//! policy yields `None` and the operator types the price in.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::money::{Money, COARSE_DP};
use crate::types::{ExcToInc, StockType};

// =============================================================================
// Markup Policy
// =============================================================================

/// How one department turns cost into a suggested price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkupPolicy {
    /// Always ask the operator.
    NoSuggestion,

    /// Cost × multiplier.
    Markup { multiplier: Decimal },

    /// Cost × multiplier, never below `floor` (compared after rounding).
    MarkupWithFloor { multiplier: Decimal, floor: Money },
}

impl MarkupPolicy {
    pub fn markup(multiplier: Decimal) -> Self {
        MarkupPolicy::Markup { multiplier }
    }

    pub fn with_floor(multiplier: Decimal, floor: Money) -> Self {
        MarkupPolicy::MarkupWithFloor { multiplier, floor }
    }

    fn check(&self, dept_id: i32) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPolicy {
            dept_id,
            reason: reason.to_string(),
        };
        match self {
            MarkupPolicy::NoSuggestion => Ok(()),
            MarkupPolicy::Markup { multiplier } => {
                if *multiplier <= Decimal::ZERO {
                    return Err(invalid("multiplier must be positive"));
                }
                Ok(())
            }
            MarkupPolicy::MarkupWithFloor { multiplier, floor } => {
                if *multiplier <= Decimal::ZERO {
                    return Err(invalid("multiplier must be positive"));
                }
                if floor.is_negative() {
                    return Err(invalid("floor must not be negative"));
                }
                Ok(())
            }
        }
    }
}

/// Suggested inc-VAT price of one sale unit.
///
/// Returns `None` for a zero unit size or on overflow.
pub fn markup(
    cost: Money,
    multiplier: Decimal,
    unit_size: Decimal,
    vat: &impl ExcToInc,
) -> Option<Money> {
    let marked_up = cost.checked_mul(multiplier)?.checked_div(unit_size)?;
    vat.exc_to_inc(marked_up).map(|inc| inc.round_up(COARSE_DP))
}

// =============================================================================
// Price Guess
// =============================================================================

/// The stock-intake workflow's view of the price guess.
pub trait PriceGuessHook: Send + Sync {
    /// Suggested price for one sale unit of `stocktype`, given `cost` ex VAT
    /// for a stock unit holding `unit_size` sale units.
    fn guess_price(&self, stocktype: &StockType, unit_size: Decimal, cost: Money) -> Option<Money>;
}

/// Department → markup policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceGuess {
    policies: BTreeMap<i32, MarkupPolicy>,
}

impl PriceGuess {
    /// No policies: every guess is `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy for `dept_id`, replacing any earlier one.
    pub fn with_policy(mut self, dept_id: i32, policy: MarkupPolicy) -> Result<Self, ConfigError> {
        policy.check(dept_id)?;
        self.policies.insert(dept_id, policy);
        Ok(self)
    }

    pub fn policy(&self, dept_id: i32) -> MarkupPolicy {
        self.policies
            .get(&dept_id)
            .copied()
            .unwrap_or(MarkupPolicy::NoSuggestion)
    }

    /// Departments with a policy, in id order.
    pub fn departments(&self) -> impl Iterator<Item = (i32, &MarkupPolicy)> {
        self.policies.iter().map(|(id, policy)| (*id, policy))
    }

    /// Guess using the VAT rate in force on `date`.
    pub fn guess_on(
        &self,
        date: NaiveDate,
        stocktype: &StockType,
        unit_size: Decimal,
        cost: Money,
    ) -> Option<Money> {
        let dept_id = stocktype.dept_id();
        let (multiplier, floor) = match self.policy(dept_id) {
            MarkupPolicy::NoSuggestion => return None,
            MarkupPolicy::Markup { multiplier } => (multiplier, None),
            MarkupPolicy::MarkupWithFloor { multiplier, floor } => (multiplier, Some(floor)),
        };

        let Some(vat) = stocktype.department.vat.at(date) else {
            debug!(dept_id, %date, "No VAT revision in force, no price suggestion");
            return None;
        };

        let guess = markup(cost, multiplier, unit_size, vat)?;
        Some(match floor {
            Some(floor) if guess <= floor => floor,
            _ => guess,
        })
    }

    /// Guess using today's VAT rate.
    pub fn guess(&self, stocktype: &StockType, unit_size: Decimal, cost: Money) -> Option<Money> {
        self.guess_on(Utc::now().date_naive(), stocktype, unit_size, cost)
    }
}

impl PriceGuessHook for PriceGuess {
    fn guess_price(&self, stocktype: &StockType, unit_size: Decimal, cost: Money) -> Option<Money> {
        self.guess(stocktype, unit_size, cost)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Department, StockUnit, VatBand, VatRevision};
    use rust_decimal_macros::dec;

    fn stocktype(dept_id: i32, vat: VatBand) -> StockType {
        StockType::new(
            "Dark Star",
            "Hophead",
            Department::new(dept_id, "Test", vat),
            StockUnit::new("pint", 1),
        )
    }

    fn bar_policies() -> PriceGuess {
        PriceGuess::new()
            .with_policy(1, MarkupPolicy::markup(dec!(3.0)))
            .unwrap()
            .with_policy(4, MarkupPolicy::with_floor(dec!(2.5), Money::new(dec!(2.50))))
            .unwrap()
    }

    fn trading_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_dept_one_is_vat_of_triple_cost_rounded_up() {
        let vat = VatBand::flat("A", dec!(20));
        let st = stocktype(1, vat.clone());
        let expected = vat
            .at(trading_day())
            .unwrap()
            .exc_to_inc(Money::new(dec!(1.00)) * dec!(3.0))
            .unwrap()
            .round_up(1);

        let guess = bar_policies().guess_on(trading_day(), &st, dec!(1), Money::new(dec!(1.00)));

        assert_eq!(guess, Some(expected));
        assert_eq!(guess, Some(Money::new(dec!(3.6))));
    }

    #[test]
    fn test_rounds_up_to_one_place_only() {
        // 72.00 × 3.0 / 88 = 2.4545..., +20% = 2.9454... → 3.0
        let st = stocktype(1, VatBand::flat("A", dec!(20)));
        let guess = bar_policies()
            .guess_on(trading_day(), &st, dec!(88), Money::new(dec!(72.00)))
            .unwrap();
        assert_eq!(guess, Money::new(dec!(3.0)));
        assert_eq!(guess.scale(), 1);
    }

    #[test]
    fn test_unconfigured_department_has_no_suggestion() {
        let st = stocktype(77, VatBand::flat("A", dec!(20)));
        assert_eq!(bar_policies().guess_on(trading_day(), &st, dec!(1), Money::new(dec!(1.00))), None);
        assert_eq!(bar_policies().policy(77), MarkupPolicy::NoSuggestion);
    }

    #[test]
    fn test_guess_is_idempotent() {
        let st = stocktype(1, VatBand::flat("A", dec!(20)));
        let policies = bar_policies();
        let first = policies.guess_on(trading_day(), &st, dec!(24), Money::new(dec!(13.37)));
        let second = policies.guess_on(trading_day(), &st, dec!(24), Money::new(dec!(13.37)));
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_floor_applies_after_rounding() {
        let st = stocktype(4, VatBand::flat("A", dec!(20)));
        let policies = bar_policies();

        // 0.50 × 2.5 = 1.25, +20% = 1.50 → below the floor
        let cheap = policies.guess_on(trading_day(), &st, dec!(1), Money::new(dec!(0.50)));
        assert_eq!(cheap, Some(Money::new(dec!(2.50))));

        // 1.00 × 2.5 = 2.50, +20% = 3.00 → above the floor
        let dear = policies.guess_on(trading_day(), &st, dec!(1), Money::new(dec!(1.00)));
        assert_eq!(dear, Some(Money::new(dec!(3.0))));
    }

    #[test]
    fn test_zero_unit_size_has_no_suggestion() {
        let st = stocktype(1, VatBand::flat("A", dec!(20)));
        assert_eq!(bar_policies().guess_on(trading_day(), &st, dec!(0), Money::new(dec!(1.00))), None);
    }

    #[test]
    fn test_uses_vat_revision_in_force() {
        let band = VatBand {
            band: "A".to_string(),
            revisions: vec![
                VatRevision::new(NaiveDate::from_ymd_opt(2011, 1, 4).unwrap(), dec!(20)),
                VatRevision::new(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), dec!(25)),
            ],
        };
        let st = stocktype(1, band);
        let policies = bar_policies();

        let now = policies.guess_on(trading_day(), &st, dec!(1), Money::new(dec!(1.00)));
        assert_eq!(now, Some(Money::new(dec!(3.6))));

        let later = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        let then = policies.guess_on(later, &st, dec!(1), Money::new(dec!(1.00)));
        // 3.00 + 25% = 3.75 → 3.8
        assert_eq!(then, Some(Money::new(dec!(3.8))));

        let before = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(policies.guess_on(before, &st, dec!(1), Money::new(dec!(1.00))), None);
    }

    #[test]
    fn test_huge_cost_has_no_suggestion() {
        let vat = VatRevision::new(NaiveDate::MIN, dec!(20));
        assert_eq!(markup(Money::new(Decimal::MAX), dec!(3.0), dec!(1), &vat), None);

        // The markup fits but adding VAT does not.
        assert_eq!(markup(Money::new(Decimal::MAX), dec!(1), dec!(1), &vat), None);

        let st = stocktype(1, VatBand::flat("A", dec!(20)));
        assert_eq!(bar_policies().guess_on(trading_day(), &st, dec!(1), Money::new(Decimal::MAX)), None);
    }

    #[test]
    fn test_invalid_policies_are_rejected() {
        let err = PriceGuess::new()
            .with_policy(2, MarkupPolicy::markup(dec!(0)))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy { dept_id: 2, .. }));

        assert!(PriceGuess::new()
            .with_policy(4, MarkupPolicy::with_floor(dec!(2.5), Money::new(dec!(-1))))
            .is_err());
    }

    #[test]
    fn test_hook_uses_today() {
        let st = stocktype(1, VatBand::flat("A", dec!(20)));
        let hook: &dyn PriceGuessHook = &bar_policies();
        assert_eq!(
            hook.guess_price(&st, dec!(1), Money::new(dec!(1.00))),
            Some(Money::new(dec!(3.6)))
        );
    }
}
