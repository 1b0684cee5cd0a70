//! Error types for the anestcalc_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for anestcalc_core operations
///
/// The dose calculator only ever produces [`Error::UnknownSelection`]; the
/// remaining variants belong to configuration loading and output rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The agent is not in the reference table, or the concentration is not
    /// offered for that agent
    #[error("unknown agent or concentration")]
    UnknownSelection { agent: String, concentration: String },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference table validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Caller-supplied value rejected before reaching the calculator
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True for the calculator's lookup failure
    pub fn is_unknown_selection(&self) -> bool {
        matches!(self, Error::UnknownSelection { .. })
    }
}
