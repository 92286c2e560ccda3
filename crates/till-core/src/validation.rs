//! # Validation Module
//!
//! Input validation for modifier and pricing parameters.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Site file (TOML)                                              │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Decimal strings parsed exactly                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Registration (Rust)                                           │
//! │  ├── THIS MODULE: names, labels, amounts                                │
//! │  └── Modifier::validate / PriceGuess::with_policy                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Rule application                                              │
//! │  └── Eligibility checks → Incompatible (operator-facing)                │
//! │                                                                         │
//! │  A bad site file fails at startup, never at the till                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_modifier_name, validate_positive};
//! use rust_decimal_macros::dec;
//!
//! validate_modifier_name("Half").unwrap();
//! validate_positive("multiplier", dec!(2.5)).unwrap();
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::{MAX_LABEL_LEN, MAX_MODIFIER_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a modifier name.
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_MODIFIER_NAME_LEN` characters
/// - No leading or trailing whitespace (names are matched exactly)
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_modifier_name;
///
/// assert!(validate_modifier_name("Wine Bottle").is_ok());
/// assert!(validate_modifier_name("").is_err());
/// assert!(validate_modifier_name(" Half").is_err());
/// ```
pub fn validate_modifier_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "modifier name".to_string(),
        });
    }

    if name.chars().count() > MAX_MODIFIER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "modifier name".to_string(),
            max: MAX_MODIFIER_NAME_LEN,
        });
    }

    if name.trim() != name {
        return Err(ValidationError::InvalidFormat {
            field: "modifier name".to_string(),
            reason: "must not start or end with whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates display text such as a description suffix or manufacturer.
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_LABEL_LEN` characters
pub fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LABEL_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a strictly positive amount (sizes, multipliers).
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount that may be zero (fixed prices, extras, floors).
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_non_negative;
/// use rust_decimal_macros::dec;
///
/// assert!(validate_non_negative("extra", dec!(0.00)).is_ok());
/// assert!(validate_non_negative("extra", dec!(-0.10)).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that no value appears twice.
pub fn validate_unique<'a>(
    field: &str,
    values: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
