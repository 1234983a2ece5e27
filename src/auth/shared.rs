//! Thread-safe wrapper around a single rolling validator.

use std::sync::{Mutex, MutexGuard};

use crate::error::TokenResult;

use super::rolling::RollingValidator;

/// A [`RollingValidator`] behind a mutex.
///
/// Every call locks the whole validator, so refreshes never race. Prefer one
/// `RollingValidator` per worker when contention matters; validators built
/// from the same secret and interval always agree.
#[derive(Debug)]
pub struct SharedValidator {
    inner: Mutex<RollingValidator>,
}

impl SharedValidator {
    pub fn new(validator: RollingValidator) -> Self {
        Self {
            inner: Mutex::new(validator),
        }
    }

    /// Check a candidate token, see [`RollingValidator::is_valid`].
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.lock().is_valid(candidate)
    }

    /// See [`RollingValidator::validate`].
    pub fn validate(&self, candidate: &str) -> TokenResult<()> {
        self.lock().validate(candidate)
    }

    /// See [`RollingValidator::validate_bearer`].
    pub fn validate_bearer(&self, header: &str) -> TokenResult<()> {
        self.lock().validate_bearer(header)
    }

    pub fn into_inner(self) -> RollingValidator {
        match self.inner.into_inner() {
            Ok(validator) => validator,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RollingValidator> {
        // Recover from mutex poisoning; a partial cache is completed by the next refresh
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl From<RollingValidator> for SharedValidator {
    fn from(validator: RollingValidator) -> Self {
        Self::new(validator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ManualClock, TokenGenerator};
    use std::sync::Arc;
    use std::thread;

    fn create_test_shared(clock: &ManualClock) -> (TokenGenerator, SharedValidator) {
        let generator = TokenGenerator::with_clock("test_secret", 30, clock.clone()).unwrap();
        let validator = RollingValidator::from_generator(generator.clone(), 1).unwrap();
        (generator, SharedValidator::new(validator))
    }

    #[test]
    fn test_concurrent_validation() {
        let clock = ManualClock::new(30 * 100);
        let (generator, shared) = create_test_shared(&clock);
        let shared = Arc::new(shared);

        let handles: Vec<_> = (-2..=2)
            .map(|offset| {
                let shared = Arc::clone(&shared);
                let token = generator.generate(offset);
                thread::spawn(move || (offset, shared.is_valid(&token.value)))
            })
            .collect();

        for handle in handles {
            let (offset, accepted) = handle.join().unwrap();
            assert_eq!(accepted, (-1..=1).contains(&offset), "offset {offset}");
        }

        let validator = Arc::try_unwrap(shared).unwrap().into_inner();
        assert_eq!(validator.cached_len(), 3);
    }

    #[test]
    fn test_shared_follows_clock() {
        let clock = ManualClock::new(30 * 100);
        let (generator, shared) = create_test_shared(&clock);
        let token = generator.generate(-1);

        assert!(shared.validate(&token.value).is_ok());
        clock.advance(30);
        assert!(shared.validate(&token.value).is_err());
        assert!(shared
            .validate_bearer(&generator.generate(0).bearer_value())
            .is_ok());
    }
}
