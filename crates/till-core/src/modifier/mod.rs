//! # Modifiers
//!
//! A modifier is a named rule the operator presses before an item key:
//! "Half" then a beer, "Large" then the house red. It either rewrites the
//! proposed sale line or refuses with [`Incompatible`].
//!
//! ## Capabilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Modifier ── name()                                                    │
//! │      │                                                                  │
//! │      ├── stock_line_rule()    ──► Some(&dyn StockLineRule)              │
//! │      │                            (every modifier in practice)          │
//! │      │                                                                  │
//! │      └── price_lookup_rule()  ──► Some(&dyn PriceLookupRule)            │
//! │                                   (only fully polymorphic rules: Wine)  │
//! │                                                                         │
//! │   Dispatch checks the capability BEFORE calling. A missing rule is an   │
//! │   Incompatible outcome, never a panic.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! Rules run against a private copy of the sale line. On `Err` the copy is
//! dropped, so the caller's line is untouched whatever the rule did first.
//! Rules still check eligibility completely before assigning anything.

pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Incompatible, RuleResult};
use crate::sale::{SaleLine, SaleSource};
use crate::types::{PriceLookup, StockLine};

pub use rules::{CaseRule, DoubleRule, FixedServingRule, HalfRule, WineRule};

// =============================================================================
// Capabilities
// =============================================================================

/// A kind of item a modifier may know how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    StockLine,
    PriceLookup,
}

impl Capability {
    /// Plural noun used in operator messages.
    pub fn target_name(&self) -> &'static str {
        match self {
            Capability::StockLine => "stock lines",
            Capability::PriceLookup => "price lookups",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::StockLine => write!(f, "stock_line"),
            Capability::PriceLookup => write!(f, "price_lookup"),
        }
    }
}

/// The set of capabilities a modifier declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub stock_line: bool,
    pub price_lookup: bool,
}

impl Capabilities {
    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::StockLine => self.stock_line,
            Capability::PriceLookup => self.price_lookup,
        }
    }
}

// =============================================================================
// Rule Traits
// =============================================================================

/// Rewrites a sale of a stock line.
pub trait StockLineRule {
    fn apply_to_stock_line(&self, line: &StockLine, sale: &mut SaleLine) -> RuleResult<()>;
}

/// Rewrites a sale of a price lookup.
pub trait PriceLookupRule {
    fn apply_to_price_lookup(&self, plu: &PriceLookup, sale: &mut SaleLine) -> RuleResult<()>;
}

/// A registered, named modifier.
///
/// Implementors override the accessor for each rule they provide. A
/// "simple" modifier provides only [`StockLineRule`].
pub trait Modifier: fmt::Debug + Send + Sync {
    /// Registry key; case-sensitive.
    fn name(&self) -> &str;

    /// One line for menus and help screens.
    fn help(&self) -> &str {
        ""
    }

    fn stock_line_rule(&self) -> Option<&dyn StockLineRule> {
        None
    }

    fn price_lookup_rule(&self) -> Option<&dyn PriceLookupRule> {
        None
    }

    /// Rejects parameters that could never produce a sensible sale line.
    /// Called once at registration.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            stock_line: self.stock_line_rule().is_some(),
            price_lookup: self.price_lookup_rule().is_some(),
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Applies `modifier` to `sale` as a sale of `line`.
///
/// Returns the rewritten line; `sale` itself is never modified.
pub fn apply_to_stock_line(
    modifier: &dyn Modifier,
    line: &StockLine,
    sale: &SaleLine,
) -> RuleResult<SaleLine> {
    let rule = modifier
        .stock_line_rule()
        .ok_or_else(|| unsupported(modifier, Capability::StockLine))?;

    let mut candidate = sale.clone();
    rule.apply_to_stock_line(line, &mut candidate)
        .inspect_err(|err| rejected(modifier, err))?;
    Ok(candidate)
}

/// Applies `modifier` to `sale` as a sale of `plu`.
///
/// Returns the rewritten line; `sale` itself is never modified.
pub fn apply_to_price_lookup(
    modifier: &dyn Modifier,
    plu: &PriceLookup,
    sale: &SaleLine,
) -> RuleResult<SaleLine> {
    let rule = modifier
        .price_lookup_rule()
        .ok_or_else(|| unsupported(modifier, Capability::PriceLookup))?;

    let mut candidate = sale.clone();
    rule.apply_to_price_lookup(plu, &mut candidate)
        .inspect_err(|err| rejected(modifier, err))?;
    Ok(candidate)
}

/// Applies `modifier` to whatever `sale` is selling.
pub fn apply(modifier: &dyn Modifier, sale: &SaleLine) -> RuleResult<SaleLine> {
    let applied = match sale.source() {
        SaleSource::StockLine(line) => apply_to_stock_line(modifier, line, sale),
        SaleSource::PriceLookup(plu) => apply_to_price_lookup(modifier, plu, sale),
    }?;

    debug!(
        modifier = modifier.name(),
        qty = %applied.qty,
        description = %applied.description,
        "Modifier applied"
    );
    Ok(applied)
}

fn unsupported(modifier: &dyn Modifier, capability: Capability) -> Incompatible {
    let err = Incompatible::unsupported(modifier.name(), capability.target_name());
    rejected(modifier, &err);
    err
}

fn rejected(modifier: &dyn Modifier, err: &Incompatible) {
    debug!(modifier = modifier.name(), reason = %err, "Modifier not applicable");
}

// =============================================================================
// Unit Tests
// =============================================================================
