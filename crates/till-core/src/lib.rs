//! # till-core: Pricing Rules for the Till
//!
//! This crate holds the rule engine behind the register's modifier keys
//! ("Half", "Double", "Large", ...) and the suggested-price calculation used
//! at stock intake. Everything here is pure: exact decimals in, exact
//! decimals out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Register UI / Stock Intake (external)               │   │
//! │  │    item keys ──► modifier keys ──► transaction ──► receipt      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SaleLine / Incompatible                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  modifier │  │  registry │  │  pricing  │  │   money   │  │   │
//! │  │   │   rules   │  │  builder  │  │PriceGuess │  │   Money   │  │   │
//! │  │   │  dispatch │  │  lookup   │  │  markup   │  │ Quantity  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FLOATS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                  till-site (Site Configuration)                 │   │
//! │  │           site.toml ──► ModifierRegistry + PriceGuess           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` and `Quantity` over exact decimals
//! - [`types`] - Stock lines, stock types, departments, VAT bands, PLUs
//! - [`sale`] - The sale line a modifier rewrites
//! - [`modifier`] - The `Modifier` trait, dispatch and the built-in rules
//! - [`registry`] - Name → modifier lookup, frozen after startup
//! - [`pricing`] - Department markup policies and the price guess
//! - [`error`] - Domain error types
//! - [`validation`] - Parameter validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the same sale line and modifier always give the same result
//! 2. **No I/O**: config files and logging setup belong to till-site
//! 3. **Exact Decimals**: no binary floating point anywhere near a price
//! 4. **Explicit Rounding**: every rounding step names its direction and places
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use till_core::modifier::HalfRule;
//! use till_core::{
//!     Department, LineType, Money, ModifierRegistry, SaleLine, StockLine, StockType,
//!     StockUnit, VatBand,
//! };
//!
//! let mut builder = ModifierRegistry::builder();
//! builder.register(HalfRule::new("Half")).unwrap();
//! let registry = builder.build();
//!
//! let ale = Department::new(1, "Real Ale", VatBand::flat("A", dec!(20)));
//! let hophead = StockType::new("Dark Star", "Hophead", ale, StockUnit::new("pint", 1));
//! let line = StockLine::new(1, "Pump 1", LineType::Regular, hophead);
//! let sale = SaleLine::from_stock_line(line, Some(Money::new(dec!(3.80))));
//!
//! let half = registry.apply("Half", &sale).unwrap();
//! assert_eq!(half.price, Some(Money::new(dec!(1.90))));
//! assert_eq!(half.description, "Dark Star Hophead half pint");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod modifier;
pub mod money;
pub mod pricing;
pub mod registry;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::{ConfigError, CoreError, CoreResult, Incompatible, ValidationError};
pub use modifier::{Capability, Modifier, PriceLookupRule, StockLineRule};
pub use money::{Money, Quantity};
pub use pricing::{MarkupPolicy, PriceGuess, PriceGuessHook};
pub use registry::{ModifierRegistry, RegistryBuilder};
pub use sale::{SaleLine, SaleSource};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest modifier name a key cap can show.
pub const MAX_MODIFIER_NAME_LEN: usize = 40;

/// Longest label (description suffix, manufacturer) accepted from a site file.
pub const MAX_LABEL_LEN: usize = 100;
