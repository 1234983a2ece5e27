//! Rolling Token Library
//!
//! Time-windowed shared-secret authentication tokens. Both sides derive
//! `HMAC-SHA256(secret, bucket)` for the current time bucket independently;
//! the validator accepts a small window of adjacent buckets to absorb clock
//! drift.
//!
//! The crate only produces and checks hex token strings. Placing a token in a
//! transport's credential slot (for HTTP, `Authorization: Bearer <token>`, see
//! [`Token::bearer_value`]) is left to the caller.

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{
    parse_bearer, Clock, ManualClock, RollingValidator, Secret, SharedValidator, SystemClock,
    Token, TokenGenerator, DEFAULT_TOLERANCE, MAX_TOLERANCE,
};
pub use error::{TokenError, TokenResult};
