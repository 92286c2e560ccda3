//! # till-site: Site Configuration for the Till
//!
//! Loads a site file and builds the modifier registry and price guess policy
//! a till runs with.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till Startup                                    │
//! │                                                                         │
//! │  1. SiteConfig::load(path)                                              │
//! │     └── defaults → site.toml → TILL_* env overrides                    │
//! │                                                                         │
//! │  2. SiteConfig::validate()                                              │
//! │     ├── every modifier registers (names unique, parameters sane)       │
//! │     ├── every binding names a registered modifier                      │
//! │     └── every department policy is sane                                │
//! │                                                                         │
//! │  3. Site::from_config(config)                                           │
//! │     └── Arc<ModifierRegistry>, Arc<PriceGuess> handed to terminals     │
//! │                                                                         │
//! │  Any failure above stops startup with a SiteError. Nothing is          │
//! │  discovered at the till mid-sale.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - `SiteConfig` and the site file format
//! - [`site`] - `Site`, the built rule set
//! - [`report`] - Human and JSON summaries of a site
//! - [`error`] - `SiteError`

pub mod config;
pub mod error;
pub mod report;
pub mod site;

pub use config::{DepartmentPricing, ModifierBinding, ModifierDef, PricingSettings, SiteConfig};
pub use error::{SiteError, SiteResult};
pub use report::SiteReport;
pub use site::Site;
