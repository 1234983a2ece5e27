//! Error types for rolling token generation and validation.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Configuration errors. Raised only while constructing a component.
    #[error("Configuration error: {kind}")]
    Config { kind: ConfigErrorKind },

    /// Authentication errors.
    #[error("Authentication error: {kind}")]
    Auth { kind: AuthErrorKind },

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration error kinds.
#[derive(Error, Debug)]
pub enum ConfigErrorKind {
    #[error("Invalid interval: {interval} seconds (must be between 1 and {max})")]
    InvalidInterval { interval: u64, max: u64 },

    #[error("Invalid tolerance: {tolerance} buckets (must be at most {max})")]
    InvalidTolerance { tolerance: u32, max: u32 },

    #[error("Failed to load secret: {message}")]
    SecretError { message: String },

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },
}

/// Authentication error kinds.
#[derive(Error, Debug)]
pub enum AuthErrorKind {
    #[error("Malformed credentials: expected 'Bearer <token>'")]
    MalformedCredentials,

    #[error("Token not accepted in the current window")]
    TokenRejected,
}

impl TokenError {
    pub(crate) fn config(kind: ConfigErrorKind) -> Self {
        Self::Config { kind }
    }

    pub(crate) fn auth(kind: AuthErrorKind) -> Self {
        Self::Auth { kind }
    }
}

/// Result type alias for token operations.
pub type TokenResult<T> = Result<T, TokenError>;
