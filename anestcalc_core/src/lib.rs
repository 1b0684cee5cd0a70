#![forbid(unsafe_code)]

//! Core domain model and dose calculator for anestcalc.
//!
//! This crate provides:
//! - Domain types (agents, ASA classes, reference profiles, results)
//! - The built-in reference table
//! - The maximum dose calculator
//! - Configuration and logging setup for the front end

pub mod types;
pub mod error;
pub mod catalog;
pub mod notes;
pub mod config;
pub mod logging;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{get_reference_table, build_reference_table};
pub use config::{Config, OutputFormat};
pub use notes::REFERENCE_CITATION;
pub use engine::{compute_max_dose, CARTRIDGE_VOLUME_ML, WEIGHT_CEILING_KG};
