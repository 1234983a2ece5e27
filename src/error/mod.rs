//! Error types for rolling tokens.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
