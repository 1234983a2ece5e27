//! HMAC-SHA256 token derivation over time buckets.

use std::fmt;
use std::sync::Arc;

use ring::hmac;
use tracing::warn;

use crate::error::{ConfigErrorKind, TokenError, TokenResult};

use super::clock::{Clock, SystemClock};
use super::encoding::hex_encode;
use super::secret::Secret;
use super::token::Token;

/// Generate-only token helper.
///
/// Holds no mutable state after construction, so a single generator can be
/// shared freely between threads.
#[derive(Clone)]
pub struct TokenGenerator {
    key: hmac::Key,
    interval: i64,
    clock: Arc<dyn Clock>,
}

impl TokenGenerator {
    /// Create a generator that reads the wall clock.
    pub fn new(secret: impl Into<Secret>, interval_seconds: u64) -> TokenResult<Self> {
        Self::with_clock(secret, interval_seconds, SystemClock)
    }

    /// Create a generator with an explicit time source.
    ///
    /// Fails if `interval_seconds` is zero or does not fit in an `i64`.
    pub fn with_clock(
        secret: impl Into<Secret>,
        interval_seconds: u64,
        clock: impl Clock + 'static,
    ) -> TokenResult<Self> {
        let interval = i64::try_from(interval_seconds)
            .ok()
            .filter(|&interval| interval > 0)
            .ok_or_else(|| {
                TokenError::config(ConfigErrorKind::InvalidInterval {
                    interval: interval_seconds,
                    max: i64::MAX as u64,
                })
            })?;

        let secret = secret.into();
        if secret.is_empty() {
            warn!("Token secret is empty, derived tokens are not authenticated");
        }

        Ok(Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
            interval,
            clock: Arc::new(clock),
        })
    }

    /// Seconds per bucket.
    pub fn interval(&self) -> u64 {
        self.interval as u64
    }

    /// Bucket for the clock's current time.
    ///
    /// The clock reading is already whole seconds; division truncates
    /// toward zero.
    pub fn current_bucket(&self) -> i64 {
        self.clock.now_secs() / self.interval
    }

    /// Derive the token value for a bucket.
    ///
    /// The message is the bucket's decimal representation, so bucket `-1`
    /// signs `"-1"`.
    pub fn derive(&self, bucket: i64) -> String {
        let tag = hmac::sign(&self.key, bucket.to_string().as_bytes());
        hex_encode(tag.as_ref())
    }

    /// Token for an explicit bucket.
    pub fn token_for_bucket(&self, bucket: i64) -> Token {
        Token {
            value: self.derive(bucket),
            bucket,
        }
    }

    /// Token for the current bucket shifted by `offset` buckets.
    ///
    /// `0` is now, negative offsets are in the past.
    pub fn generate(&self, offset: i64) -> Token {
        self.token_for_bucket(self.current_bucket().saturating_add(offset))
    }
}

impl fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
