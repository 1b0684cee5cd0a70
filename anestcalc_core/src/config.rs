//! Configuration file support for anestcalc.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/anestcalc/config.toml`.
//! It only tunes the front end (default weight, output style); the reference
//! table is fixed.

use crate::engine::WEIGHT_CEILING_KG;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lowest weight the front end accepts
pub const MIN_WEIGHT_KG: f64 = 1.0;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub patient: PatientConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Patient defaults used when an argument is omitted
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientConfig {
    #[serde(default = "default_weight_kg")]
    pub default_weight_kg: f64,
}

impl Default for PatientConfig {
    fn default() -> Self {
        Self {
            default_weight_kg: default_weight_kg(),
        }
    }
}

/// How results are rendered
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_true")]
    pub show_notes: bool,

    #[serde(default = "default_true")]
    pub show_reference: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_notes: true,
            show_reference: true,
        }
    }
}

// Default value functions
fn default_weight_kg() -> f64 {
    70.0
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("anestcalc")
            .join("config.toml")
    }

    /// Check values the TOML schema cannot express
    pub fn validate(&self) -> Result<()> {
        let weight = self.patient.default_weight_kg;
        if !(MIN_WEIGHT_KG..=WEIGHT_CEILING_KG).contains(&weight) {
            return Err(Error::Config(format!(
                "patient.default_weight_kg must be between {} and {} kg, got {}",
                MIN_WEIGHT_KG, WEIGHT_CEILING_KG, weight
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
