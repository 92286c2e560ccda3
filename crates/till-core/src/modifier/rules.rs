//! # Built-in Rules
//!
//! Parameterised modifiers a site declares in its configuration.
//!
//! | Rule               | Applies to                             | Effect                         |
//! |--------------------|----------------------------------------|--------------------------------|
//! | [`CaseRule`]       | one manufacturer's stock               | qty, price × case size         |
//! | [`HalfRule`]       | stock sold in pints                    | qty × 0.5, price ÷ 2           |
//! | [`FixedServingRule`] | ml stock priced per pint (568ml)     | qty := n ml, price := fixed    |
//! | [`DoubleRule`]     | spirits sold in single measures        | qty, price × 2                 |
//! | [`WineRule`]       | continuous 750ml wine lines, wine PLUs | glass size and glass price     |
//!
//! Every rule leaves `price` alone when it is `None`: the sale pipeline
//! prices the line later.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{Modifier, PriceLookupRule, StockLineRule};
use crate::error::{ConfigError, Incompatible, RuleResult};
use crate::money::{Money, Quantity, COARSE_DP, CURRENCY_DP};
use crate::sale::SaleLine;
use crate::types::{LineType, PluPriceField, PriceLookup, StockLine};
use crate::validation::{validate_label, validate_non_negative, validate_positive, validate_unique};

/// Millilitres in an imperial pint.
pub const PINT_ML: u32 = 568;

/// Millilitres in a standard wine bottle.
pub const BOTTLE_ML: u32 = 750;

/// Department id conventionally used for wine.
pub const WINE_DEPT: i32 = 90;

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidModifier {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn too_large(name: &str) -> Incompatible {
    Incompatible::new(format!(
        "The {name} modifier cannot be used on a line this large."
    ))
}

// =============================================================================
// Case
// =============================================================================

/// Sells a whole case of one manufacturer's product.
///
/// The stock type named `special_stocktype` comes in cases of
/// `special_qty`; everything else from the manufacturer in cases of
/// `default_qty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRule {
    pub name: String,
    pub manufacturer: String,
    #[serde(default)]
    pub special_stocktype: Option<String>,
    #[serde(default = "default_special_case_qty")]
    pub special_qty: u32,
    #[serde(default = "default_case_qty")]
    pub default_qty: u32,
}

fn default_special_case_qty() -> u32 {
    24
}

fn default_case_qty() -> u32 {
    20
}

impl CaseRule {
    pub fn new(name: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        CaseRule {
            name: name.into(),
            manufacturer: manufacturer.into(),
            special_stocktype: None,
            special_qty: default_special_case_qty(),
            default_qty: default_case_qty(),
        }
    }

    /// Sets the stock type sold in the larger case.
    #[must_use]
    pub fn with_special(mut self, stocktype: impl Into<String>, qty: u32) -> Self {
        self.special_stocktype = Some(stocktype.into());
        self.special_qty = qty;
        self
    }

    fn case_qty(&self, stocktype_name: &str) -> u32 {
        match &self.special_stocktype {
            Some(special) if special == stocktype_name => self.special_qty,
            _ => self.default_qty,
        }
    }
}

impl StockLineRule for CaseRule {
    fn apply_to_stock_line(&self, line: &StockLine, sale: &mut SaleLine) -> RuleResult<()> {
        let st = &line.stocktype;
        if st.manufacturer != self.manufacturer {
            return Err(Incompatible::new(format!(
                "The {} modifier can only be used with {}.",
                self.name, self.manufacturer
            )));
        }
        let case_qty = self.case_qty(&st.name);
        let factor = Decimal::from(case_qty);
        let qty = sale
            .qty
            .checked_mul(factor)
            .ok_or_else(|| too_large(&self.name))?;
        let price = match sale.price {
            Some(p) => Some(p.checked_mul(factor).ok_or_else(|| too_large(&self.name))?),
            None => None,
        };
        let description = format!("{st} case of {case_qty}");

        sale.qty = qty;
        sale.price = price;
        sale.description = description;
        Ok(())
    }
}

impl Modifier for CaseRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        "Sell a whole case; quantity and price are multiplied by the case size."
    }

    fn stock_line_rule(&self) -> Option<&dyn StockLineRule> {
        Some(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_label("manufacturer", &self.manufacturer)?;
        if self.special_qty == 0 || self.default_qty == 0 {
            return Err(invalid(&self.name, "case sizes must be positive"));
        }
        Ok(())
    }
}

// =============================================================================
// Half
// =============================================================================

/// Half a pint.
///
/// Eligible stock is sold in a unit named "pint", or in "ml" with 568 ml
/// per sale unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfRule {
    pub name: String,
}

impl HalfRule {
    pub fn new(name: impl Into<String>) -> Self {
        HalfRule { name: name.into() }
    }
}

impl StockLineRule for HalfRule {
    fn apply_to_stock_line(&self, line: &StockLine, sale: &mut SaleLine) -> RuleResult<()> {
        let st = &line.stocktype;
        if !(st.unit.name == "pint" || st.unit.is("ml", PINT_ML)) {
            return Err(Incompatible::new(format!(
                "The {} modifier can only be used with stock that is sold in pints.",
                self.name
            )));
        }
        let description = format!("{st} half pint");

        sale.price = sale.price.map(|p| p.halve());
        sale.qty = sale.qty * dec!(0.5);
        sale.description = description;
        Ok(())
    }
}

impl Modifier for HalfRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        "Half a pint at half the price."
    }

    fn stock_line_rule(&self) -> Option<&dyn StockLineRule> {
        Some(self)
    }
}

// =============================================================================
// Fixed Serving (Mixer, Carton)
// =============================================================================

/// A fixed serving of a soft drink at a fixed price.
///
/// Eligible stock is counted in ml and priced per pint (568 ml per sale
/// unit). The quantity becomes `qty` ml and a known price becomes `price`.
/// `Some(0)` is a known price and is replaced like any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedServingRule {
    pub name: String,
    /// Appended to the stock type name, e.g. "mixer".
    pub label: String,
    pub qty: Quantity,
    pub price: Money,
}

impl FixedServingRule {
    pub fn new(name: impl Into<String>, label: impl Into<String>, qty: Quantity, price: Money) -> Self {
        FixedServingRule {
            name: name.into(),
            label: label.into(),
            qty,
            price,
        }
    }

    /// A 100ml mixer at 70p.
    pub fn mixer() -> Self {
        FixedServingRule::new("Mixer", "mixer", Quantity::new(dec!(100.0)), Money::new(dec!(0.70)))
    }

    /// A 1l carton at £3.00.
    pub fn carton() -> Self {
        FixedServingRule::new("Carton", "carton", Quantity::new(dec!(1000.0)), Money::new(dec!(3.00)))
    }
}

impl StockLineRule for FixedServingRule {
    fn apply_to_stock_line(&self, line: &StockLine, sale: &mut SaleLine) -> RuleResult<()> {
        let st = &line.stocktype;
        if !st.unit.is("ml", PINT_ML) {
            return Err(Incompatible::new(format!(
                "The {} modifier can only be used with soft drinks.",
                self.name
            )));
        }
        let description = format!("{st} {}", self.label);

        if sale.price.is_some() {
            sale.price = Some(self.price);
        }
        sale.qty = self.qty;
        sale.description = description;
        Ok(())
    }
}

impl Modifier for FixedServingRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        "A fixed serving of a soft drink at a fixed price."
    }

    fn stock_line_rule(&self) -> Option<&dyn StockLineRule> {
        Some(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_label("label", &self.label)?;
        validate_positive("qty", self.qty.value())?;
        validate_non_negative("price", self.price.amount())?;
        Ok(())
    }
}

// =============================================================================
// Double
// =============================================================================

/// A double measure of spirits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleRule {
    pub name: String,
    /// Stock unit names that count as a single measure.
    #[serde(default = "default_measures")]
    pub measures: Vec<String>,
}

fn default_measures() -> Vec<String> {
    vec!["25ml".to_string(), "50ml".to_string()]
}

impl DoubleRule {
    pub fn new(name: impl Into<String>) -> Self {
        DoubleRule {
            name: name.into(),
            measures: default_measures(),
        }
    }
}

impl StockLineRule for DoubleRule {
    fn apply_to_stock_line(&self, line: &StockLine, sale: &mut SaleLine) -> RuleResult<()> {
        let st = &line.stocktype;
        if !self.measures.contains(&st.unit.name) {
            return Err(Incompatible::new(format!(
                "The {} modifier can only be used with spirits.",
                self.name
            )));
        }
        let qty = sale
            .qty
            .checked_mul(Decimal::TWO)
            .ok_or_else(|| too_large(&self.name))?;
        let price = match sale.price {
            Some(p) => Some(p.checked_mul(Decimal::TWO).ok_or_else(|| too_large(&self.name))?),
            None => None,
        };

        sale.price = price;
        sale.qty = qty;
        sale.description = format!("{st} double {}", st.unit.name);
        Ok(())
    }
}

impl Modifier for DoubleRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        "A double measure at twice the price."
    }

    fn stock_line_rule(&self) -> Option<&dyn StockLineRule> {
        Some(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.measures.is_empty() {
            return Err(invalid(&self.name, "at least one measure is required"));
        }
        for measure in &self.measures {
            validate_label("measure", measure)?;
        }
        validate_unique("measure", self.measures.iter().map(String::as_str))?;
        Ok(())
    }
}

// =============================================================================
// Wine
// =============================================================================

/// One serving size of wine.
///
/// ## Stock lines
/// The line must be continuous, sell stock counted in ml and priced per
/// 750ml bottle, and belong to the wine department. The quantity becomes
/// `size` ml. A known bottle price becomes
/// ```text
/// round_up(size / 750 × price, 1dp) → re-expressed at 2dp → + extra
/// ```
/// `size / 750` is a 28-digit decimal, so a ratio like 125/750 sits a hair
/// above one sixth. A product that would land exactly on a tenth therefore
/// rounds up one step: £9.00 gives £1.60 and £12.00 gives £2.10.
///
/// ## Price lookups
/// The PLU must belong to the wine department and have `field` set to a
/// non-zero price, which becomes the sale price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineRule {
    pub name: String,
    /// Serving size in ml.
    pub size: Quantity,
    /// Appended to the description, e.g. "125ml glass".
    pub text: String,
    /// PLU price field holding this serving's price.
    pub field: PluPriceField,
    /// Added to the stock line price after rounding.
    #[serde(default)]
    pub extra: Money,
    #[serde(default = "default_wine_dept")]
    pub dept_id: i32,
}

fn default_wine_dept() -> i32 {
    WINE_DEPT
}

impl WineRule {
    pub fn new(
        name: impl Into<String>,
        size: Quantity,
        text: impl Into<String>,
        field: PluPriceField,
        extra: Money,
    ) -> Self {
        WineRule {
            name: name.into(),
            size,
            text: text.into(),
            field,
            extra,
            dept_id: WINE_DEPT,
        }
    }

    /// Price of one serving given the bottle price, or `None` on overflow.
    pub fn serving_price(&self, bottle_price: Money) -> Option<Money> {
        let ratio = self.size.value().checked_div(Decimal::from(BOTTLE_ML))?;
        bottle_price
            .checked_mul(ratio)?
            .round_up(COARSE_DP)
            .quantize(CURRENCY_DP)
            .checked_add(self.extra)
    }

    fn not_wine() -> Incompatible {
        Incompatible::new("This modifier can only be used with wine.")
    }
}

impl StockLineRule for WineRule {
    fn apply_to_stock_line(&self, line: &StockLine, sale: &mut SaleLine) -> RuleResult<()> {
        let st = &line.stocktype;
        if line.linetype != LineType::Continuous
            || !st.unit.is("ml", BOTTLE_ML)
            || st.dept_id() != self.dept_id
        {
            return Err(Self::not_wine());
        }

        let price = match sale.price {
            Some(p) => Some(self.serving_price(p).ok_or_else(|| too_large(&self.name))?),
            None => None,
        };

        sale.qty = self.size;
        sale.description = format!("{st} {}", self.text);
        sale.price = price;
        Ok(())
    }
}

impl PriceLookupRule for WineRule {
    fn apply_to_price_lookup(&self, plu: &PriceLookup, sale: &mut SaleLine) -> RuleResult<()> {
        if plu.dept_id != self.dept_id {
            return Err(Self::not_wine());
        }
        let price = plu
            .price_field(self.field)
            .filter(|p| !p.is_zero())
            .ok_or_else(|| {
                Incompatible::new(format!(
                    "The {} price lookup does not have {} set.",
                    plu.description, self.field
                ))
            })?;

        sale.price = Some(price);
        sale.description = format!("{} {}", plu.description, self.text);
        Ok(())
    }
}

impl Modifier for WineRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        "A serving of wine by the glass or bottle."
    }

    fn stock_line_rule(&self) -> Option<&dyn StockLineRule> {
        Some(self)
    }

    fn price_lookup_rule(&self) -> Option<&dyn PriceLookupRule> {
        Some(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_positive("size", self.size.value())?;
        validate_label("text", &self.text)?;
        validate_non_negative("extra", self.extra.amount())?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{apply, apply_to_stock_line, Capability};
    use crate::types::{Department, StockType, StockUnit, VatBand};

    fn dept(id: i32) -> Department {
        Department::new(id, format!("Dept {id}"), VatBand::flat("A", dec!(20)))
    }

    fn line(
        manufacturer: &str,
        name: &str,
        dept_id: i32,
        unit: StockUnit,
        linetype: LineType,
    ) -> StockLine {
        let st = StockType::new(manufacturer, name, dept(dept_id), unit);
        StockLine::new(1, "Test line", linetype, st)
    }

    fn sale(line: StockLine, price: Option<Decimal>) -> SaleLine {
        SaleLine::from_stock_line(line, price.map(Money::new))
    }

    fn beer() -> StockLine {
        line("Dark Star", "Hophead", 1, StockUnit::new("pint", 1), LineType::Regular)
    }

    fn beer_in_ml() -> StockLine {
        line("Dark Star", "Hophead", 1, StockUnit::new("ml", 568), LineType::Regular)
    }

    fn cola() -> StockLine {
        line("Fentimans", "Cola", 7, StockUnit::new("ml", 568), LineType::Continuous)
    }

    fn spirit(measure: &str) -> StockLine {
        line("Hayman's", "London Dry Gin", 4, StockUnit::new(measure, 1), LineType::Regular)
    }

    fn club_mate(name: &str) -> StockLine {
        line("Club Mate", name, 7, StockUnit::new("bottle", 1), LineType::Display)
    }

    fn wine_line() -> StockLine {
        line("Vina Sol", "Torres", 90, StockUnit::new("ml", 750), LineType::Continuous)
    }

    fn small() -> WineRule {
        WineRule::new(
            "Small",
            Quantity::new(dec!(125.0)),
            "125ml glass",
            PluPriceField::AltPrice1,
            Money::new(dec!(0.00)),
        )
    }

    fn medium() -> WineRule {
        WineRule::new(
            "Medium",
            Quantity::new(dec!(175.0)),
            "175ml glass",
            PluPriceField::AltPrice2,
            Money::new(dec!(0.00)),
        )
    }

    fn large() -> WineRule {
        WineRule::new(
            "Large",
            Quantity::new(dec!(250.0)),
            "250ml glass",
            PluPriceField::AltPrice3,
            Money::new(dec!(0.00)),
        )
    }

    fn club_mate_case() -> CaseRule {
        CaseRule::new("Case", "Club Mate").with_special("Regular 330ml", 24)
    }

    // -------------------------------------------------------------------------
    // Case
    // -------------------------------------------------------------------------

    #[test]
    fn test_case_of_regular_is_24() {
        let out = apply(&club_mate_case(), &sale(club_mate("Regular 330ml"), Some(dec!(2.50)))).unwrap();
        assert_eq!(out.qty.value(), dec!(24));
        assert_eq!(out.price.unwrap().amount(), dec!(60.00));
        assert_eq!(out.description, "Club Mate Regular 330ml case of 24");
    }

    #[test]
    fn test_case_of_anything_else_is_20() {
        let out = apply(&club_mate_case(), &sale(club_mate("Granat 500ml"), Some(dec!(3.00)))).unwrap();
        assert_eq!(out.qty.value(), dec!(20));
        assert_eq!(out.price.unwrap().amount(), dec!(60.00));
        assert_eq!(out.description, "Club Mate Granat 500ml case of 20");
    }

    #[test]
    fn test_case_without_price_still_scales_qty() {
        let out = apply(&club_mate_case(), &sale(club_mate("Regular 330ml"), None)).unwrap();
        assert_eq!(out.qty.value(), dec!(24));
        assert_eq!(out.price, None);
    }

    #[test]
    fn test_case_rejects_other_manufacturers() {
        let err = apply(&club_mate_case(), &sale(cola(), Some(dec!(2.00)))).unwrap_err();
        assert_eq!(err.reason(), "The Case modifier can only be used with Club Mate.");
    }

    // -------------------------------------------------------------------------
    // Half
    // -------------------------------------------------------------------------

    #[test]
    fn test_half_of_pint() {
        let out = apply(&HalfRule::new("Half"), &sale(beer(), Some(dec!(3.80)))).unwrap();
        assert_eq!(out.qty.value(), dec!(0.5));
        assert_eq!(out.price.unwrap().amount(), dec!(1.90));
        assert_eq!(out.description, "Dark Star Hophead half pint");
    }

    #[test]
    fn test_half_of_pint_in_ml() {
        let out = apply(&HalfRule::new("Half"), &sale(beer_in_ml(), Some(dec!(3.85)))).unwrap();
        assert_eq!(out.qty.value(), dec!(0.5));
        assert_eq!(out.price.unwrap().amount(), dec!(1.925));
    }

    #[test]
    fn test_half_halves_every_pint_price_exactly() {
        for cents in [1_i64, 99, 100, 355, 380, 1001] {
            let price = Decimal::new(cents, 2);
            let out = apply(&HalfRule::new("Half"), &sale(beer(), Some(price))).unwrap();
            assert_eq!(out.price.unwrap().amount() * Decimal::TWO, price);
        }
    }

    #[test]
    fn test_half_rejects_spirit_measures() {
        for measure in ["25ml", "50ml"] {
            let offered = sale(spirit(measure), Some(dec!(2.20)));
            let before = offered.clone();
            let err = apply(&HalfRule::new("Half"), &offered).unwrap_err();
            assert_eq!(
                err.reason(),
                "The Half modifier can only be used with stock that is sold in pints."
            );
            assert_eq!(offered, before);
        }
    }

    // -------------------------------------------------------------------------
    // Mixer / Carton
    // -------------------------------------------------------------------------

    #[test]
    fn test_mixer() {
        let out = apply(&FixedServingRule::mixer(), &sale(cola(), Some(dec!(2.50)))).unwrap();
        assert_eq!(out.qty.value(), dec!(100.0));
        assert_eq!(out.price.unwrap().amount(), dec!(0.70));
        assert_eq!(out.description, "Fentimans Cola mixer");
    }

    #[test]
    fn test_mixer_replaces_a_zero_price() {
        let out = apply(&FixedServingRule::mixer(), &sale(cola(), Some(dec!(0.00)))).unwrap();
        assert_eq!(out.price, Some(Money::new(dec!(0.70))));
    }

    #[test]
    fn test_carton_without_price_keeps_it_unset() {
        let out = apply(&FixedServingRule::carton(), &sale(cola(), None)).unwrap();
        assert_eq!(out.qty.value(), dec!(1000.0));
        assert_eq!(out.price, None);
        assert_eq!(out.description, "Fentimans Cola carton");
    }

    #[test]
    fn test_mixer_rejects_pints() {
        let err = apply(&FixedServingRule::mixer(), &sale(beer(), Some(dec!(3.80)))).unwrap_err();
        assert_eq!(err.reason(), "The Mixer modifier can only be used with soft drinks.");
    }

    // -------------------------------------------------------------------------
    // Double
    // -------------------------------------------------------------------------

    #[test]
    fn test_double() {
        let out = apply(&DoubleRule::new("Double"), &sale(spirit("25ml"), Some(dec!(2.20)))).unwrap();
        assert_eq!(out.qty.value(), dec!(2));
        assert_eq!(out.price.unwrap().amount(), dec!(4.40));
        assert_eq!(out.description, "Hayman's London Dry Gin double 25ml");
    }

    #[test]
    fn test_double_rejects_beer() {
        let err = apply(&DoubleRule::new("Double"), &sale(beer(), Some(dec!(3.80)))).unwrap_err();
        assert_eq!(err.reason(), "The Double modifier can only be used with spirits.");
    }

    // -------------------------------------------------------------------------
    // Wine: stock lines
    // -------------------------------------------------------------------------

    #[test]
    fn test_wine_small_from_nine_pound_bottle() {
        let out = apply(&small(), &sale(wine_line(), Some(dec!(9.00)))).unwrap();
        assert_eq!(out.qty.value(), dec!(125.0));
        assert_eq!(out.price.unwrap().amount().to_string(), "1.60");
        assert_eq!(out.description, "Vina Sol Torres 125ml glass");
    }

    #[test]
    fn test_wine_medium_and_large() {
        let out = apply(&medium(), &sale(wine_line(), Some(dec!(9.00)))).unwrap();
        assert_eq!(out.price.unwrap().amount().to_string(), "2.10");

        let out = apply(&large(), &sale(wine_line(), Some(dec!(9.00)))).unwrap();
        assert_eq!(out.price.unwrap().amount().to_string(), "3.00");
    }

    #[test]
    fn test_wine_rounds_up_not_to_nearest() {
        // 11.50 × 125/750 = 1.91666...
        let out = apply(&small(), &sale(wine_line(), Some(dec!(11.50)))).unwrap();
        assert_eq!(out.price.unwrap().amount().to_string(), "2.00");
    }

    #[test]
    fn test_wine_exact_tenth_rounds_up_a_step() {
        // 12.00 × 125/750 is 2.0 on paper; the 28-digit ratio lifts it just past.
        let out = apply(&small(), &sale(wine_line(), Some(dec!(12.00)))).unwrap();
        assert_eq!(out.price.unwrap().amount().to_string(), "2.10");
    }

    #[test]
    fn test_wine_adds_extra_after_rounding() {
        let mut rule = small();
        rule.extra = Money::new(dec!(0.25));
        let out = apply(&rule, &sale(wine_line(), Some(dec!(9.00)))).unwrap();
        assert_eq!(out.price.unwrap().amount(), dec!(1.85));
    }

    #[test]
    fn test_wine_without_price() {
        let out = apply(&small(), &sale(wine_line(), None)).unwrap();
        assert_eq!(out.qty.value(), dec!(125.0));
        assert_eq!(out.price, None);
    }

    #[test]
    fn test_wine_rejects_non_continuous_or_wrong_dept() {
        let bottles = line("Vina Sol", "Torres", 90, StockUnit::new("ml", 750), LineType::Display);
        let err = apply(&small(), &sale(bottles, Some(dec!(9.00)))).unwrap_err();
        assert_eq!(err.reason(), "This modifier can only be used with wine.");

        let cider = line("Westons", "Medium", 3, StockUnit::new("ml", 750), LineType::Continuous);
        assert!(apply(&small(), &sale(cider, Some(dec!(9.00)))).is_err());

        assert!(apply(&small(), &sale(cola(), Some(dec!(9.00)))).is_err());
    }

    // -------------------------------------------------------------------------
    // Wine: price lookups
    // -------------------------------------------------------------------------

    fn house_red() -> PriceLookup {
        let mut plu = PriceLookup::new(5, "House Red", 90, Some(Money::new(dec!(18.00))));
        plu.altprice1 = Some(Money::new(dec!(4.00)));
        plu.altprice2 = Some(Money::new(dec!(5.50)));
        plu
    }

    #[test]
    fn test_wine_plu_uses_named_field() {
        let out = apply(&small(), &SaleLine::from_price_lookup(house_red())).unwrap();
        assert_eq!(out.price, Some(Money::new(dec!(4.00))));
        assert_eq!(out.description, "House Red 125ml glass");
        assert_eq!(out.qty, Quantity::one());
    }

    #[test]
    fn test_wine_plu_missing_field_is_incompatible() {
        let offered = SaleLine::from_price_lookup(house_red());
        let before = offered.clone();

        let err = apply(&large(), &offered).unwrap_err();

        assert_eq!(err.reason(), "The House Red price lookup does not have altprice3 set.");
        assert_eq!(offered, before);
    }

    #[test]
    fn test_wine_plu_zero_price_counts_as_unset() {
        let mut plu = house_red();
        plu.altprice3 = Some(Money::zero());
        let err = apply(&large(), &SaleLine::from_price_lookup(plu)).unwrap_err();
        assert!(err.reason().contains("altprice3"));
    }

    #[test]
    fn test_wine_plu_wrong_department() {
        let mut plu = house_red();
        plu.dept_id = 2;
        let err = apply(&small(), &SaleLine::from_price_lookup(plu)).unwrap_err();
        assert_eq!(err.reason(), "This modifier can only be used with wine.");
    }

    // -------------------------------------------------------------------------
    // Stock line context
    // -------------------------------------------------------------------------

    #[test]
    fn test_rules_check_the_stock_line_they_are_given() {
        let red = SaleLine::from_price_lookup(house_red());

        let out = apply_to_stock_line(&HalfRule::new("Half"), &beer(), &red).unwrap();
        assert_eq!(out.price, Some(Money::new(dec!(9.00))));
        assert_eq!(out.description, "Dark Star Hophead half pint");

        let out = apply_to_stock_line(&club_mate_case(), &club_mate("Regular 330ml"), &red).unwrap();
        assert_eq!(out.qty.value(), dec!(24));

        let out = apply_to_stock_line(&FixedServingRule::carton(), &cola(), &red).unwrap();
        assert_eq!(out.description, "Fentimans Cola carton");

        let out = apply_to_stock_line(&DoubleRule::new("Double"), &spirit("50ml"), &red).unwrap();
        assert_eq!(out.description, "Hayman's London Dry Gin double 50ml");

        let out = apply_to_stock_line(&small(), &wine_line(), &red).unwrap();
        assert_eq!(out.qty.value(), dec!(125.0));
    }

    #[test]
    fn test_stock_line_decides_eligibility_not_sale_source() {
        let pint = sale(beer(), Some(dec!(3.80)));
        let err = apply_to_stock_line(&HalfRule::new("Half"), &spirit("25ml"), &pint).unwrap_err();
        assert!(err.reason().contains("sold in pints"));
    }

    // -------------------------------------------------------------------------
    // Overflow
    // -------------------------------------------------------------------------

    #[test]
    fn test_scaling_a_huge_price_is_incompatible() {
        let huge = sale(club_mate("Regular 330ml"), Some(Decimal::MAX));
        let before = huge.clone();
        let err = apply(&club_mate_case(), &huge).unwrap_err();
        assert_eq!(err.reason(), "The Case modifier cannot be used on a line this large.");
        assert_eq!(huge, before);

        let err = apply(&DoubleRule::new("Double"), &sale(spirit("25ml"), Some(Decimal::MAX))).unwrap_err();
        assert_eq!(err.reason(), "The Double modifier cannot be used on a line this large.");

        let mut huge_qty = sale(spirit("25ml"), None);
        huge_qty.qty = Quantity::new(Decimal::MAX);
        assert!(apply(&DoubleRule::new("Double"), &huge_qty).is_err());
    }

    #[test]
    fn test_magnum_of_huge_price_is_incompatible() {
        let magnum = WineRule::new(
            "Magnum",
            Quantity::new(dec!(1500.0)),
            "magnum",
            PluPriceField::AltPrice3,
            Money::zero(),
        );
        assert_eq!(magnum.serving_price(Money::new(Decimal::MAX)), None);
        assert!(apply(&magnum, &sale(wine_line(), Some(Decimal::MAX))).is_err());
        assert_eq!(magnum.serving_price(Money::new(dec!(9.00))), Some(Money::new(dec!(18.00))));
    }

    // -------------------------------------------------------------------------
    // Capabilities and validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_simple_rules_refuse_price_lookups() {
        let sale = SaleLine::from_price_lookup(house_red());
        for modifier in [
            &HalfRule::new("Half") as &dyn Modifier,
            &DoubleRule::new("Double"),
            &FixedServingRule::mixer(),
            &club_mate_case(),
        ] {
            assert!(!modifier.capabilities().contains(Capability::PriceLookup));
            let err = apply(modifier, &sale).unwrap_err();
            assert!(err.reason().contains("operation not supported"));
        }
        assert!(small().capabilities().contains(Capability::PriceLookup));
    }

    #[test]
    fn test_validation() {
        assert!(small().validate().is_ok());
        assert!(FixedServingRule::mixer().validate().is_ok());

        let mut bad = small();
        bad.size = Quantity::new(dec!(0));
        assert!(bad.validate().is_err());

        let mut bad = CaseRule::new("Case", "Club Mate");
        bad.default_qty = 0;
        assert!(bad.validate().is_err());

        let mut bad = DoubleRule::new("Double");
        bad.measures.clear();
        assert!(bad.validate().is_err());
    }
}
