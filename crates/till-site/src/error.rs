//! # Site Error Types
//!
//! Error types for loading and saving site configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Site Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   File I/O      │  │    Format       │  │     Rules               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ ConfigLoadFailed│  │  InvalidConfig  │  │  Core(ConfigError)      │ │
//! │  │ ConfigSaveFailed│  │  (TOML / JSON)  │  │  unknown / duplicate /  │ │
//! │  │                 │  │                 │  │  invalid modifier       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant is fatal at startup: a till never opens with a          │
//! │  half-loaded rule set.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use till_core::ConfigError;

/// Result type alias for site configuration operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Site configuration failures.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Failed to read the site file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the site file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// The site file parsed but makes no sense.
    ///
    /// ## When This Occurs
    /// - TOML syntax errors or wrong field types
    /// - A decimal written as a float instead of a string
    /// - An empty site name
    #[error("Invalid site configuration: {0}")]
    InvalidConfig(String),

    /// A rule or policy was rejected by till-core.
    #[error(transparent)]
    Core(#[from] ConfigError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for SiteError {
    fn from(err: std::io::Error) -> Self {
        SiteError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SiteError {
    fn from(err: toml::de::Error) -> Self {
        SiteError::InvalidConfig(err.to_string())
    }
}

impl From<toml::ser::Error> for SiteError {
    fn from(err: toml::ser::Error) -> Self {
        SiteError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::InvalidConfig(err.to_string())
    }
}
