//! Time source for issuing and validating tokens
//!
//! Every time-dependent decision reads the current instant through a [`Clock`],
//! so hosts and tests can pin time with a [`FrozenClock`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current Unix timestamp in seconds
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds
    fn now(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        unix_seconds(SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default())
    }
}

/// Whole seconds of `elapsed`, saturating at `i64::MAX`
fn unix_seconds(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct FrozenClock {
    now: AtomicI64,
}

impl FrozenClock {
    /// Freeze time at `timestamp`
    pub fn at(timestamp: i64) -> Self {
        Self {
            now: AtomicI64::new(timestamp),
        }
    }

    /// Freeze time at the current wall-clock instant
    pub fn from_system() -> Self {
        Self::at(SystemClock.now())
    }

    /// Move the clock to `timestamp`
    pub fn set(&self, timestamp: i64) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
