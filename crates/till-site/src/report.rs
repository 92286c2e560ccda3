//! # Site Report
//!
//! What a site file would set up, in a form both people and scripts can read.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use till_core::{MarkupPolicy, Money, ModifierRegistry, PriceGuess};

use crate::config::SiteConfig;

/// One registered modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierReport {
    pub name: String,
    pub kind: String,
    pub stock_lines: bool,
    pub price_lookups: bool,
    pub help: String,
}

/// One department's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub dept_id: i32,
    pub multiplier: Decimal,
    pub floor: Option<Money>,
}

/// Everything a till would build from a site file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub site: String,
    pub modifiers: Vec<ModifierReport>,
    pub price_guess_enabled: bool,
    pub departments: Vec<PolicyReport>,
    pub bindings: Vec<(String, String)>,
}

impl SiteReport {
    /// Describes `registry` and `guess` as built from `config`.
    pub fn new(config: &SiteConfig, registry: &ModifierRegistry, guess: &PriceGuess) -> Self {
        let modifiers = config
            .modifiers
            .iter()
            .filter_map(|def| {
                let modifier = registry.get(def.name())?;
                let caps = modifier.capabilities();
                Some(ModifierReport {
                    name: modifier.name().to_string(),
                    kind: def.kind().to_string(),
                    stock_lines: caps.stock_line,
                    price_lookups: caps.price_lookup,
                    help: modifier.help().to_string(),
                })
            })
            .collect();

        let departments = guess
            .departments()
            .filter_map(|(dept_id, policy)| match *policy {
                MarkupPolicy::NoSuggestion => None,
                MarkupPolicy::Markup { multiplier } => Some(PolicyReport {
                    dept_id,
                    multiplier,
                    floor: None,
                }),
                MarkupPolicy::MarkupWithFloor { multiplier, floor } => {
                    Some(PolicyReport {
                        dept_id,
                        multiplier,
                        floor: Some(floor),
                    })
                }
            })
            .collect();

        SiteReport {
            site: config.site.name.clone(),
            modifiers,
            price_guess_enabled: config.pricing.enabled,
            departments,
            bindings: config
                .bindings
                .iter()
                .map(|b| (b.key.clone(), b.modifier.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for SiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Site: {}", self.site)?;
        writeln!(f)?;
        writeln!(f, "Modifiers ({}):", self.modifiers.len())?;
        for m in &self.modifiers {
            let targets = match (m.stock_lines, m.price_lookups) {
                (true, true) => "stock lines, price lookups",
                (true, false) => "stock lines",
                (false, true) => "price lookups",
                (false, false) => "nothing",
            };
            writeln!(f, "  {:<12} {:<14} {}", m.name, m.kind, targets)?;
        }

        writeln!(f)?;
        if self.price_guess_enabled {
            writeln!(f, "Price guess ({} departments):", self.departments.len())?;
            for d in &self.departments {
                match d.floor {
                    Some(floor) => {
                        writeln!(f, "  dept {:<4} × {} (floor {})", d.dept_id, d.multiplier, floor)?
                    }
                    None => writeln!(f, "  dept {:<4} × {}", d.dept_id, d.multiplier)?,
                }
            }
        } else {
            writeln!(f, "Price guess: disabled")?;
        }

        if !self.bindings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Bindings ({}):", self.bindings.len())?;
            for (key, modifier) in &self.bindings {
                writeln!(f, "  {key:<12} → {modifier}")?;
            }
        }
        Ok(())
    }
}
