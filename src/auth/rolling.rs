//! Tolerance-window validation of rolling tokens.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{AuthErrorKind, ConfigErrorKind, TokenError, TokenResult};

use super::hmac::TokenGenerator;
use super::secret::Secret;
use super::token::{parse_bearer, Token};

/// Buckets accepted on each side of the current one when none is given.
pub const DEFAULT_TOLERANCE: u32 = 1;

/// Largest accepted tolerance. Wider windows mean thousands of HMACs per
/// refresh and accept tokens for hours or days.
pub const MAX_TOLERANCE: u32 = 1024;

/// Validator accepting tokens from `[current - tolerance, current + tolerance]`.
///
/// Tokens for the window are cached and only recomputed when the clock moves
/// into a new bucket. The cache is refreshed lazily at the start of each
/// validation call, never in the background.
///
/// Validation takes `&mut self`. To validate from several threads, either give
/// each thread its own validator or wrap one in a
/// [`SharedValidator`](super::SharedValidator).
pub struct RollingValidator {
    generator: TokenGenerator,
    tolerance: u32,
    /// At most one token per bucket in the current window.
    active: Vec<Token>,
}

impl RollingValidator {
    /// Create a validator on the wall clock with [`DEFAULT_TOLERANCE`].
    pub fn new(secret: impl Into<Secret>, interval_seconds: u64) -> TokenResult<Self> {
        Self::with_tolerance(secret, interval_seconds, DEFAULT_TOLERANCE)
    }

    /// Create a validator on the wall clock with an explicit tolerance.
    pub fn with_tolerance(
        secret: impl Into<Secret>,
        interval_seconds: u64,
        tolerance: u32,
    ) -> TokenResult<Self> {
        let generator = TokenGenerator::new(secret, interval_seconds)?;
        Self::from_generator(generator, tolerance)
    }

    /// Build a validator around an existing generator, sharing its secret,
    /// interval and clock.
    ///
    /// Fails if `tolerance` exceeds [`MAX_TOLERANCE`].
    pub fn from_generator(generator: TokenGenerator, tolerance: u32) -> TokenResult<Self> {
        if tolerance > MAX_TOLERANCE {
            return Err(TokenError::config(ConfigErrorKind::InvalidTolerance {
                tolerance,
                max: MAX_TOLERANCE,
            }));
        }

        Ok(Self {
            generator,
            tolerance,
            active: Vec::new(),
        })
    }

    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    pub fn generator(&self) -> &TokenGenerator {
        &self.generator
    }

    /// Number of tokens currently cached.
    pub fn cached_len(&self) -> usize {
        self.active.len()
    }

    /// Check whether `candidate` is a token for any bucket in the window.
    pub fn is_valid(&mut self, candidate: &str) -> bool {
        self.refresh();
        let accepted = self.active.iter().any(|token| token.value == candidate);
        trace!(accepted, "Checked candidate token");
        accepted
    }

    /// Like [`is_valid`](Self::is_valid), but reports rejection as an error.
    pub fn validate(&mut self, candidate: &str) -> TokenResult<()> {
        if self.is_valid(candidate) {
            Ok(())
        } else {
            Err(TokenError::auth(AuthErrorKind::TokenRejected))
        }
    }

    /// Validate an `Authorization` header value of the form `Bearer <token>`.
    pub fn validate_bearer(&mut self, header: &str) -> TokenResult<()> {
        let candidate = parse_bearer(header)
            .ok_or_else(|| TokenError::auth(AuthErrorKind::MalformedCredentials))?;
        self.validate(candidate)
    }

    /// Bring the cache in line with the current window, returning how many
    /// tokens had to be derived.
    ///
    /// Eviction must run before the size check: a full cache is only known to
    /// be correct once every out-of-window entry has been dropped.
    fn refresh(&mut self) -> usize {
        let current = self.generator.current_bucket();
        let tolerance = u64::from(self.tolerance);

        self.active.retain(|token| token.bucket.abs_diff(current) <= tolerance);

        if self.active.len() == window_len(self.tolerance) {
            return 0;
        }

        let first = current.saturating_sub(i64::from(self.tolerance));
        let last = current.saturating_add(i64::from(self.tolerance));
        let present: HashSet<i64> = self.active.iter().map(|token| token.bucket).collect();
        let mut computed = 0usize;

        for bucket in (first..=last).filter(|bucket| !present.contains(bucket)) {
            self.active.push(self.generator.token_for_bucket(bucket));
            computed += 1;
        }

        debug!(
            bucket = current,
            tolerance = self.tolerance,
            computed,
            "Refreshed active token window"
        );
        computed
    }
}

impl fmt::Debug for RollingValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cached values are live credentials, only report how many there are
        f.debug_struct("RollingValidator")
            .field("generator", &self.generator)
            .field("tolerance", &self.tolerance)
            .field("cached", &self.active.len())
            .finish()
    }
}

fn window_len(tolerance: u32) -> usize {
    1 + 2 * tolerance as usize
}
