//! Configuration module.
//!
//! Handles loading and validating token configuration from TOML files.

mod settings;

pub use settings::*;
