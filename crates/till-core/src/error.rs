//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── Incompatible     - Expected: modifier can't apply to this item    │
//! │  ├── ConfigError      - Unexpected: bad site configuration             │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  └── CoreError        - Either of the first two, for callers that      │
//! │                         resolve by name and apply in one step          │
//! │                                                                         │
//! │  till-site errors (separate crate)                                     │
//! │  └── SiteError        - Config file load/save failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → ConfigError → SiteError → startup aborts      │
//! │        Incompatible ─────────────────────────────► operator dialog     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (modifier name, department, field)
//! 3. `Incompatible` is an outcome, not a fault: it carries a sentence the
//!    operator reads as-is and is never logged above debug level

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Incompatible
// =============================================================================

/// A modifier cannot be applied to the chosen item.
///
/// ## User Workflow
/// ```text
/// Press "Half" then a spirits key
///      │
///      ▼
/// Half checks the stock unit: "25ml" is not a pint
///      │
///      ▼
/// Incompatible { reason: "The Half modifier can only be used with stock
///                         that is sold in pints." }
///      │
///      ▼
/// UI shows the reason in an error dialog; the transaction is untouched
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[error("{reason}")]
pub struct Incompatible {
    /// Displayable sentence, shown verbatim.
    pub reason: String,
}

impl Incompatible {
    pub fn new(reason: impl Into<String>) -> Self {
        Incompatible {
            reason: reason.into(),
        }
    }

    /// The modifier exists but has no rule for this kind of item.
    pub fn unsupported(modifier: &str, target: &str) -> Self {
        Incompatible::new(format!(
            "The {modifier} modifier can't be used with {target}: operation not supported."
        ))
    }

    /// The sentence to show the operator.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Site configuration mistakes, found while building the registry or
/// checking what buttons and stock lines refer to.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A name was looked up that was never registered.
    ///
    /// ## When This Occurs
    /// - A keyboard binding refers to a modifier that isn't declared
    /// - A typo in a site file (`"half"` vs `"Half"`: names are case-sensitive)
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    /// Two modifiers were registered under one name without an explicit override.
    #[error("Modifier '{0}' is already registered")]
    DuplicateModifier(String),

    /// A modifier definition has parameters that can never work.
    #[error("Modifier '{name}' is invalid: {reason}")]
    InvalidModifier { name: String, reason: String },

    /// A department pricing policy has parameters that can never work.
    #[error("Pricing policy for department {dept_id} is invalid: {reason}")]
    InvalidPolicy { dept_id: i32, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of names and parameters before a rule or
/// policy is accepted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. leading whitespace in a name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. a measure listed twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Either outcome of resolving a modifier by name and applying it.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Incompatible(#[from] Incompatible),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CoreError {
    /// True for the expected "can't do that with this item" outcome.
    pub fn is_incompatible(&self) -> bool {
        matches!(self, CoreError::Incompatible(_))
    }

    /// True when the site configuration is at fault.
    pub fn is_config_error(&self) -> bool {
        matches!(self, CoreError::Config(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result of applying one rule.
pub type RuleResult<T> = Result<T, Incompatible>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incompatible_shows_reason_verbatim() {
        let err = Incompatible::new("This modifier can only be used with wine.");
        assert_eq!(err.to_string(), "This modifier can only be used with wine.");
        assert_eq!(err.reason(), "This modifier can only be used with wine.");
    }

    #[test]
    fn test_unsupported_message() {
        let err = Incompatible::unsupported("Half", "price lookups");
        assert_eq!(
            err.to_string(),
            "The Half modifier can't be used with price lookups: operation not supported."
        );
    }

    #[test]
    fn test_incompatible_serializes_for_ui() {
        let err = Incompatible::new("nope");
        assert_eq!(serde_json::to_string(&err).unwrap(), r#"{"reason":"nope"}"#);
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::UnknownModifier("Tripple".to_string());
        assert_eq!(err.to_string(), "Unknown modifier: Tripple");

        let err = ConfigError::DuplicateModifier("Half".to_string());
        assert_eq!(err.to_string(), "Modifier 'Half' is already registered");

        let err = ConfigError::InvalidPolicy {
            dept_id: 4,
            reason: "multiplier must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pricing policy for department 4 is invalid: multiplier must be positive"
        );
    }

    #[test]
    fn test_validation_converts_to_config_error() {
        let validation_err = ValidationError::Required {
            field: "modifier name".to_string(),
        };
        let config_err: ConfigError = validation_err.into();
        assert!(matches!(config_err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_core_error_categories() {
        let err: CoreError = Incompatible::new("no").into();
        assert!(err.is_incompatible());
        assert!(!err.is_config_error());
        assert_eq!(err.to_string(), "no");

        let err: CoreError = ConfigError::UnknownModifier("X".to_string()).into();
        assert!(err.is_config_error());
        assert!(!err.is_incompatible());
    }
}
