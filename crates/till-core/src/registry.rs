//! # Modifier Registry
//!
//! Name → modifier lookup, built once at startup and read-only afterwards.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Startup (single thread)                                                │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  RegistryBuilder::new()                                          │  │
//! │  │     .register(HalfRule::new("Half"))?     duplicate → error      │  │
//! │  │     .register(WineRule::new("Large", ..))?                       │  │
//! │  │     .register_override(..)                explicit replace       │  │
//! │  │  .build()  ──► ModifierRegistry (frozen)                         │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ Arc<ModifierRegistry>                 │
//! │            ┌────────────────────┼────────────────────┐                  │
//! │            ▼                    ▼                    ▼                  │
//! │       Terminal 1           Terminal 2           Stock intake            │
//! │    registry.apply(..)   registry.get(..)                                │
//! │                                                                         │
//! │  No locks: nothing can register once build() has returned               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ConfigError, CoreResult};
use crate::modifier::{self, Modifier};
use crate::sale::SaleLine;
use crate::validation::validate_modifier_name;

// =============================================================================
// Builder
// =============================================================================

/// Collects modifiers during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modifiers: BTreeMap<String, Arc<dyn Modifier>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `modifier` under its own name.
    ///
    /// ## Errors
    /// - `Validation` / `InvalidModifier`: the name or parameters are unusable
    /// - `DuplicateModifier`: the name is already taken
    pub fn register<M: Modifier + 'static>(&mut self, modifier: M) -> Result<&mut Self, ConfigError> {
        self.register_shared(Arc::new(modifier))
    }

    /// Registers an already shared modifier.
    pub fn register_shared(&mut self, modifier: Arc<dyn Modifier>) -> Result<&mut Self, ConfigError> {
        check(modifier.as_ref())?;

        let name = modifier.name().to_string();
        if self.modifiers.contains_key(&name) {
            return Err(ConfigError::DuplicateModifier(name));
        }

        debug!(modifier = %name, capabilities = ?modifier.capabilities(), "Registered modifier");
        self.modifiers.insert(name, modifier);
        Ok(self)
    }

    /// Registers `modifier`, replacing any modifier of the same name.
    pub fn register_override<M: Modifier + 'static>(
        &mut self,
        modifier: M,
    ) -> Result<&mut Self, ConfigError> {
        check(&modifier)?;

        let name = modifier.name().to_string();
        if self.modifiers.insert(name.clone(), Arc::new(modifier)).is_some() {
            warn!(modifier = %name, "Modifier overridden");
        } else {
            debug!(modifier = %name, "Registered modifier");
        }
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Freezes the registry.
    pub fn build(self) -> ModifierRegistry {
        info!(count = self.modifiers.len(), "Modifier registry ready");
        ModifierRegistry {
            modifiers: self.modifiers,
        }
    }
}

fn check(modifier: &dyn Modifier) -> Result<(), ConfigError> {
    validate_modifier_name(modifier.name())?;
    modifier.validate()
}

// =============================================================================
// Registry
// =============================================================================

/// The frozen set of modifiers. Share it as `Arc<ModifierRegistry>`.
#[derive(Debug, Default)]
pub struct ModifierRegistry {
    modifiers: BTreeMap<String, Arc<dyn Modifier>>,
}

impl ModifierRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks a modifier up by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Modifier>> {
        self.modifiers.get(name)
    }

    /// Like [`get`](Self::get), but a missing name is a configuration error.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Modifier>, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownModifier(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Modifier>> {
        self.modifiers.values()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Resolves `name` and applies it to `sale`.
    ///
    /// ## Errors
    /// - `CoreError::Config(UnknownModifier)`: nothing is registered as `name`
    /// - `CoreError::Incompatible`: the modifier refused this item
    pub fn apply(&self, name: &str, sale: &SaleLine) -> CoreResult<SaleLine> {
        let found = self.resolve(name)?;
        Ok(modifier::apply(found.as_ref(), sale)?)
    }

    /// Checks that every referenced name is registered.
    ///
    /// ## When This Occurs
    /// At startup, for every keyboard binding and stock-line attachment, so
    /// that a typo fails the load instead of a sale.
    pub fn check_bindings<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ConfigError> {
        for name in names {
            self.resolve(name)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
