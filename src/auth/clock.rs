//! Time sources for bucket computation.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current unix time in whole seconds.
///
/// Implemented for [`SystemClock`], [`ManualClock`] and any
/// `Fn() -> i64 + Send + Sync` closure.
pub trait Clock: Send + Sync {
    /// Current unix time, truncated to whole seconds.
    fn now_secs(&self) -> i64;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            // Clock set before 1970
            Err(e) => i64::try_from(e.duration().as_secs())
                .map(|secs| -secs)
                .unwrap_or(i64::MIN),
        }
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_secs(&self) -> i64 {
        self()
    }
}

/// Manually driven clock for simulations and tests.
///
/// Clones share the same underlying time, so a generator and a validator
/// built from clones of one `ManualClock` always agree on "now".
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock fixed at the given unix time.
    pub fn new(secs: i64) -> Self {
        Self {
            secs: Arc::new(AtomicI64::new(secs)),
        }
    }

    /// Set the current time.
    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    /// Move the clock forward (or backward, for negative values).
    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_epoch() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_secs() > 1_577_836_800);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let other = clock.clone();

        clock.advance(30);
        assert_eq!(other.now_secs(), 130);

        other.set(5);
        assert_eq!(clock.now_secs(), 5);
    }

    #[test]
    fn test_closure_clock() {
        let clock = || 1_260_i64;
        assert_eq!(clock.now_secs(), 1_260);
    }
}
