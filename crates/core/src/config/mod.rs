//! Application configuration.
//!
//! Loaded from a TOML file with `EVOLIBRARY_`-prefixed environment variable
//! overrides. Secrets are redacted through [`SanitizedConfig`] before any
//! config is exposed over the API.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
