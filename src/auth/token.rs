//! Token values and bearer credential helpers.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Authorization scheme prefix for bearer credentials.
pub const BEARER_PREFIX: &str = "Bearer ";

/// A derived token and the bucket it was derived for.
///
/// Equality and hashing only look at `value`; `bucket` is metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    /// Lowercase hex HMAC-SHA256 digest (64 characters).
    pub value: String,
    /// Time bucket the token belongs to.
    pub bucket: i64,
}

impl Token {
    /// `Authorization` header value for this token: `Bearer <value>`.
    pub fn bearer_value(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.value)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Extract the credentials from a `Bearer` authorization header value.
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes or when no credentials follow the scheme.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, credentials) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let credentials = credentials.trim();
    if credentials.is_empty() {
        None
    } else {
        Some(credentials)
    }
}
