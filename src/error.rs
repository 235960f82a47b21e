// SPDX-License-Identifier: MIT

//! Typed error handling for ast-filter
//!
//! Parsing never fails; these errors come from evaluating a condition against
//! data of the wrong shape and from loading rule configuration.

use thiserror::Error;

/// Top-level error type for ast-filter
#[derive(Debug, Error)]
pub enum FilterError {
    /// Absent data (null record, empty record list, null item collection)
    #[error("data can't be {0}")]
    InvalidInput(String),

    /// Data present but not of the required shape
    #[error("invalid type, {0} is required")]
    InvalidType(String),

    /// A qualified lookup hit a map entry that is not record-shaped
    #[error("unable to cast entry '{0}' to a record")]
    UnableToCastRecord(String),

    /// Rule configuration errors (empty or duplicate rule names)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl FilterError {
    /// Create an invalid input error
    pub fn invalid_input(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }

    /// Create an invalid type error
    pub fn invalid_type(required: impl Into<String>) -> Self {
        Self::InvalidType(required.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FilterError>;
