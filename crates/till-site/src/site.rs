//! # Site Startup
//!
//! Builds the shared, read-only rule set a till runs with.
//!
//! ```text
//! site file + env ──► SiteConfig::build ──► Arc<ModifierRegistry>
//!                                      └──► Arc<PriceGuess>
//! ```
//!
//! Nothing is built until the whole site file has validated; terminals then
//! clone the `Arc`s and never lock.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use till_core::{ModifierRegistry, PriceGuess};

use crate::config::SiteConfig;
use crate::error::SiteResult;
use crate::report::SiteReport;

/// A loaded site: its configuration and what was built from it.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    registry: Arc<ModifierRegistry>,
    price_guess: Arc<PriceGuess>,
}

impl Site {
    /// Loads the site file (see [`SiteConfig::load`]) and builds from it.
    pub fn open(config_path: Option<PathBuf>) -> SiteResult<Self> {
        Self::from_config(SiteConfig::read(config_path)?)
    }

    /// Builds from an already loaded configuration.
    pub fn from_config(config: SiteConfig) -> SiteResult<Self> {
        let (registry, price_guess) = config.build()?;
        let registry = Arc::new(registry);
        let price_guess = Arc::new(price_guess);

        info!(
            site = %config.site_name(),
            modifiers = registry.len(),
            bindings = config.bindings.len(),
            "Site ready"
        );

        Ok(Site {
            config,
            registry,
            price_guess,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Shared handle to the frozen registry.
    pub fn registry(&self) -> Arc<ModifierRegistry> {
        Arc::clone(&self.registry)
    }

    /// Shared handle to the price guess policy.
    pub fn price_guess(&self) -> Arc<PriceGuess> {
        Arc::clone(&self.price_guess)
    }

    pub fn report(&self) -> SiteReport {
        SiteReport::new(&self.config, &self.registry, &self.price_guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModifierBinding;
    use crate::error::SiteError;
    use rust_decimal_macros::dec;
    use till_core::types::{Department, StockType, StockUnit, VatBand};
    use till_core::{ConfigError, Money, PriceGuessHook};

    #[test]
    fn test_reference_site_builds() {
        let site = Site::from_config(SiteConfig::default()).unwrap();
        assert_eq!(site.registry().len(), 9);
        assert_eq!(site.report().modifiers.len(), 9);
        assert_eq!(site.config().site_name(), "Bar");
    }

    #[test]
    fn test_bad_binding_builds_nothing() {
        let mut config = SiteConfig::default();
        config.bindings.push(ModifierBinding::new("K_X", "half"));

        let err = Site::from_config(config).unwrap_err();

        assert!(matches!(err, SiteError::Core(ConfigError::UnknownModifier(_))));
    }

    #[test]
    fn test_open_rejects_a_broken_site_file() {
        let dir = std::env::temp_dir().join(format!("till-site-open-{}", std::process::id()));
        let path = dir.join("site.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            &path,
            r#"
            [[modifiers]]
            kind = "half"
            name = "Half"

            [[modifiers]]
            kind = "half"
            name = "Half"
            "#,
        )
        .unwrap();

        let err = Site::open(Some(path)).unwrap_err();

        assert!(matches!(err, SiteError::Core(ConfigError::DuplicateModifier(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_price_guess_handle_serves_stock_intake() {
        let site = Site::from_config(SiteConfig::default()).unwrap();
        let hook: Arc<dyn PriceGuessHook> = site.price_guess();

        let keg = Department::new(2, "Keg", VatBand::flat("A", dec!(20)));
        let lager = StockType::new("Camden", "Hells", keg, StockUnit::new("pint", 1));

        // 100.00 × 2.3 / 88 = 2.6136..., +20% = 3.1363... → 3.2
        let guess = hook.guess_price(&lager, dec!(88), Money::new(dec!(100.00)));
        assert_eq!(guess, Some(Money::new(dec!(3.2))));
    }
}
