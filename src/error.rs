//! Error types for ReasonKit Reader
//!
//! The extraction pipeline itself does not fail: degenerate pages produce a
//! placeholder, missing structure makes activation a no-op. Errors only come
//! from configuration, from driving a surface with a control it does not
//! support, and from the I/O around the pipeline.

use thiserror::Error;

/// The main error type for ReasonKit Reader operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A control was invoked on a surface that does not support it
    #[error("Unsupported on {strategy} surface: {operation}")]
    Unsupported {
        /// Strategy of the live surface
        strategy: String,
        /// Operation that was attempted
        operation: String,
    },

    /// Theme name not one of light, sepia, dark
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Strategy name not one of overlay, replace
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Unparseable toolbar or CLI action
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Font bounds are inverted or the default lies outside them
    #[error("Invalid font range: min {min}, default {default}, max {max}")]
    FontRange {
        /// Smallest allowed size
        min: u32,
        /// Initial size
        default: u32,
        /// Largest allowed size
        max: u32,
    },

    /// Font step of zero would make the size controls inert
    #[error("Font step must be positive")]
    ZeroFontStep,

    /// An ad word that normalizes to the empty string
    #[error("Ad word list contains a blank entry")]
    BlankAdWord,
}

/// Result type alias for ReasonKit Reader operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported-operation error
    pub fn unsupported<S: Into<String>, O: Into<String>>(strategy: S, operation: O) -> Self {
        Error::Unsupported {
            strategy: strategy.into(),
            operation: operation.into(),
        }
    }
}
