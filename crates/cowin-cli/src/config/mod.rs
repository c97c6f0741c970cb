//! Application configuration module.
//!
//! Reads the JSON (or TOML) file holding the region, eligibility and
//! alert settings.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ConfigReadError};
