//! Configuration settings for rolling tokens.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::{RollingValidator, Secret, TokenGenerator, MAX_TOLERANCE};
use crate::error::{ConfigErrorKind, TokenError, TokenResult};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub token: TokenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Token derivation configuration.
///
/// Exactly one of `secret` and `secret_path` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Inline shared secret.
    #[serde(default)]
    pub secret: Option<Secret>,
    /// Path to a file holding the shared secret.
    #[serde(default)]
    pub secret_path: Option<PathBuf>,
    /// Seconds per time bucket.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Buckets accepted on each side of the current one.
    #[serde(default = "default_tolerance")]
    pub tolerance: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_interval() -> u64 {
    30
}

fn default_tolerance() -> u32 {
    crate::auth::DEFAULT_TOLERANCE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> TokenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            invalid(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            invalid(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Resolve the configured secret, reading `secret_path` if needed.
    pub fn secret(&self) -> TokenResult<Secret> {
        match (&self.token.secret, &self.token.secret_path) {
            (Some(secret), None) => Ok(secret.clone()),
            (None, Some(path)) => Secret::load(path),
            _ => Err(invalid(
                "Exactly one of 'token.secret' and 'token.secret_path' must be set".to_string(),
            )),
        }
    }

    /// Build a generator on the wall clock.
    pub fn generator(&self) -> TokenResult<TokenGenerator> {
        TokenGenerator::new(self.secret()?, self.token.interval_seconds)
    }

    /// Build a validator on the wall clock.
    pub fn validator(&self) -> TokenResult<RollingValidator> {
        RollingValidator::from_generator(self.generator()?, self.token.tolerance)
    }

    /// Validate the settings.
    fn validate(&self) -> TokenResult<()> {
        if self.token.interval_seconds == 0 {
            return Err(invalid(
                "Invalid interval_seconds 0. Must be at least 1".to_string(),
            ));
        }

        if self.token.tolerance > MAX_TOLERANCE {
            return Err(invalid(format!(
                "Invalid tolerance {}. Must be at most {}",
                self.token.tolerance, MAX_TOLERANCE
            )));
        }

        if self.token.secret.is_some() == self.token.secret_path.is_some() {
            return Err(invalid(
                "Exactly one of 'token.secret' and 'token.secret_path' must be set".to_string(),
            ));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(invalid(format!(
                "Invalid log level '{}'. Valid levels: {:?}",
                self.logging.level, valid_levels
            )));
        }

        // Validate log format
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(invalid(format!(
                "Invalid log format '{}'. Valid formats: {:?}",
                self.logging.format, valid_formats
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> TokenError {
    TokenError::config(ConfigErrorKind::InvalidSettings { message })
}
