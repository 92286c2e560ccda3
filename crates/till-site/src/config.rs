//! # Site Configuration
//!
//! Which modifiers a site offers, how it marks up deliveries, and which keys
//! the modifiers are bound to.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_SITE_NAME=Bar                                                 │
//! │     TILL_PRICE_GUESS=off                                               │
//! │                                                                         │
//! │  2. TOML Site File                                                     │
//! │     --config <path>, else TILL_SITE_CONFIG, else                       │
//! │     ~/.config/rules/site.toml (Linux)                                  │
//! │     ~/Library/Application Support/org.till.rules/site.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     The reference bar: Case, Half, Mixer, Carton, Double, wine sizes   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [site]
//! name = "Bar"
//!
//! [[modifiers]]
//! kind = "half"
//! name = "Half"
//!
//! [[modifiers]]
//! kind = "wine"
//! name = "Large"
//! size = "250.0"
//! text = "250ml glass"
//! field = "altprice3"
//!
//! [[pricing.departments]]
//! dept_id = 4
//! multiplier = "2.5"
//! floor = "2.50"
//!
//! [[bindings]]
//! key = "K_HALF"
//! modifier = "Half"
//! ```
//!
//! Money, quantities and multipliers are quoted decimal strings so that no
//! value ever passes through a float. A section left out of the file keeps
//! the reference bar's value for that section.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use till_core::modifier::{CaseRule, DoubleRule, FixedServingRule, HalfRule, WineRule};
use till_core::validation::{validate_label, validate_unique};
use till_core::{
    ConfigError, MarkupPolicy, Modifier, ModifierRegistry, Money, PluPriceField, PriceGuess,
    Quantity,
};

use crate::error::{SiteError, SiteResult};

/// Environment variable naming the site file.
pub const CONFIG_PATH_ENV: &str = "TILL_SITE_CONFIG";

/// Environment variable overriding `site.name`.
pub const SITE_NAME_ENV: &str = "TILL_SITE_NAME";

/// Environment variable switching the price guess on or off.
pub const PRICE_GUESS_ENV: &str = "TILL_PRICE_GUESS";

// =============================================================================
// Site Settings
// =============================================================================

/// Identifies the site in logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub name: String,
}

fn default_site_name() -> String {
    "Bar".to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            name: default_site_name(),
        }
    }
}

// =============================================================================
// Modifier Definitions
// =============================================================================

/// One modifier as written in the site file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierDef {
    Case(CaseRule),
    Half(HalfRule),
    FixedServing(FixedServingRule),
    Double(DoubleRule),
    Wine(WineRule),
}

impl ModifierDef {
    /// The `kind` tag as written in the file.
    pub fn kind(&self) -> &'static str {
        match self {
            ModifierDef::Case(_) => "case",
            ModifierDef::Half(_) => "half",
            ModifierDef::FixedServing(_) => "fixed_serving",
            ModifierDef::Double(_) => "double",
            ModifierDef::Wine(_) => "wine",
        }
    }

    pub fn name(&self) -> &str {
        self.as_modifier().name()
    }

    pub fn as_modifier(&self) -> &dyn Modifier {
        match self {
            ModifierDef::Case(rule) => rule,
            ModifierDef::Half(rule) => rule,
            ModifierDef::FixedServing(rule) => rule,
            ModifierDef::Double(rule) => rule,
            ModifierDef::Wine(rule) => rule,
        }
    }

    pub fn into_modifier(self) -> Arc<dyn Modifier> {
        match self {
            ModifierDef::Case(rule) => Arc::new(rule),
            ModifierDef::Half(rule) => Arc::new(rule),
            ModifierDef::FixedServing(rule) => Arc::new(rule),
            ModifierDef::Double(rule) => Arc::new(rule),
            ModifierDef::Wine(rule) => Arc::new(rule),
        }
    }
}

fn default_modifiers() -> Vec<ModifierDef> {
    let wine = |name: &str, size: Decimal, text: &str, field: PluPriceField| {
        ModifierDef::Wine(WineRule::new(name, Quantity::new(size), text, field, Money::zero()))
    };

    vec![
        ModifierDef::Case(CaseRule::new("Case", "Club Mate").with_special("Regular 330ml", 24)),
        ModifierDef::Half(HalfRule::new("Half")),
        ModifierDef::FixedServing(FixedServingRule::mixer()),
        ModifierDef::FixedServing(FixedServingRule::carton()),
        ModifierDef::Double(DoubleRule::new("Double")),
        wine("Small", dec!(125.0), "125ml glass", PluPriceField::AltPrice1),
        wine("Medium", dec!(175.0), "175ml glass", PluPriceField::AltPrice2),
        wine("Large", dec!(250.0), "250ml glass", PluPriceField::AltPrice3),
        wine("Wine Bottle", dec!(750.0), "75cl bottle", PluPriceField::Price),
    ]
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Markup for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPricing {
    pub dept_id: i32,
    pub multiplier: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Money>,
}

impl DepartmentPricing {
    pub fn new(dept_id: i32, multiplier: Decimal) -> Self {
        DepartmentPricing {
            dept_id,
            multiplier,
            floor: None,
        }
    }

    pub fn policy(&self) -> MarkupPolicy {
        match self.floor {
            Some(floor) => MarkupPolicy::with_floor(self.multiplier, floor),
            None => MarkupPolicy::markup(self.multiplier),
        }
    }
}

/// Price guess settings. Departments not listed get no suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// When false, stock intake never prefills a price.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub departments: Vec<DepartmentPricing>,
}

fn default_true() -> bool {
    true
}

impl Default for PricingSettings {
    fn default() -> Self {
        let floored = |dept_id, multiplier, floor| DepartmentPricing {
            dept_id,
            multiplier,
            floor: Some(Money::new(floor)),
        };

        PricingSettings {
            enabled: true,
            departments: vec![
                DepartmentPricing::new(1, dec!(3.0)),
                DepartmentPricing::new(2, dec!(2.3)),
                DepartmentPricing::new(3, dec!(2.6)),
                floored(4, dec!(2.5), dec!(2.50)),
                DepartmentPricing::new(5, dec!(2.0)),
                DepartmentPricing::new(6, dec!(2.0)),
                DepartmentPricing::new(13, dec!(2.3)),
            ],
        }
    }
}

// =============================================================================
// Bindings
// =============================================================================

/// A key (or stock line attachment) that triggers a modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBinding {
    pub key: String,
    pub modifier: String,
}

impl ModifierBinding {
    pub fn new(key: impl Into<String>, modifier: impl Into<String>) -> Self {
        ModifierBinding {
            key: key.into(),
            modifier: modifier.into(),
        }
    }
}

// =============================================================================
// Main Site Configuration
// =============================================================================

/// Complete site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSettings,
    pub modifiers: Vec<ModifierDef>,
    pub pricing: PricingSettings,
    pub bindings: Vec<ModifierBinding>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site: SiteSettings::default(),
            modifiers: default_modifiers(),
            pricing: PricingSettings::default(),
            bindings: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// The reference bar site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Site file (`config_path`, `TILL_SITE_CONFIG`, platform config dir)
    /// 3. Environment variables
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> SiteResult<Self> {
        let config = Self::read(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, site file and environment, without validation.
    pub(crate) fn read(config_path: Option<PathBuf>) -> SiteResult<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::resolve_path(config_path) {
            if path.exists() {
                info!(?path, "Loading site config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Site file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parses a site file without env overrides or validation.
    pub fn from_file(path: &Path) -> SiteResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SiteError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parses site TOML without env overrides or validation.
    pub fn from_toml(contents: &str) -> SiteResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SiteResult<()> {
        let path = Self::resolve_path(config_path)
            .ok_or_else(|| SiteError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SiteError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SiteError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Site config saved");
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// Builds everything the till would build at startup, so a site that
    /// passes here cannot fail later for configuration reasons.
    pub fn validate(&self) -> SiteResult<()> {
        self.build().map(|_| ())
    }

    /// Checks the whole site, then returns the frozen registry and the
    /// price guess built from it.
    pub fn build(&self) -> SiteResult<(ModifierRegistry, PriceGuess)> {
        validate_label("site name", &self.site.name).map_err(ConfigError::from)?;

        validate_unique(
            "binding key",
            self.bindings.iter().map(|binding| binding.key.as_str()),
        )
        .map_err(ConfigError::from)?;

        let mut seen = HashSet::new();
        for department in &self.pricing.departments {
            if !seen.insert(department.dept_id) {
                return Err(ConfigError::InvalidPolicy {
                    dept_id: department.dept_id,
                    reason: "department listed more than once".to_string(),
                }
                .into());
            }
        }

        let registry = self.build_registry()?;
        registry.check_bindings(self.bindings.iter().map(|binding| binding.modifier.as_str()))?;
        let guess = self.price_guess()?;

        Ok((registry, guess))
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup(SITE_NAME_ENV) {
            debug!(site = %name, "Overriding site name from environment");
            self.site.name = name;
        }

        if let Some(value) = lookup(PRICE_GUESS_ENV) {
            match value.to_lowercase().as_str() {
                "on" | "true" | "1" => self.pricing.enabled = true,
                "off" | "false" | "0" => self.pricing.enabled = false,
                _ => warn!(value = %value, "Unknown price guess setting in environment"),
            }
        }
    }

    /// Explicit path, else `TILL_SITE_CONFIG`, else the platform default.
    fn resolve_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
        config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path)
    }

    /// Returns the default site file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "till", "rules")
            .map(|dirs| dirs.config_dir().join("site.toml"))
    }

    // =========================================================================
    // Startup Products
    // =========================================================================

    /// Registers every declared modifier and freezes the registry.
    pub fn build_registry(&self) -> SiteResult<ModifierRegistry> {
        let mut builder = ModifierRegistry::builder();
        for def in &self.modifiers {
            builder.register_shared(def.clone().into_modifier())?;
        }
        Ok(builder.build())
    }

    /// The department markup policies, or none at all when disabled.
    pub fn price_guess(&self) -> SiteResult<PriceGuess> {
        if !self.pricing.enabled {
            debug!("Price guess disabled for this site");
            return Ok(PriceGuess::new());
        }

        let mut guess = PriceGuess::new();
        for department in &self.pricing.departments {
            guess = guess.with_policy(department.dept_id, department.policy())?;
        }
        Ok(guess)
    }

    /// Returns the site name.
    pub fn site_name(&self) -> &str {
        &self.site.name
    }
}
