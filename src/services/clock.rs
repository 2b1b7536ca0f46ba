//! Wall-clock source for token issuance and expiry checks.
//!
//! The codec never calls `Utc::now()` directly so that expiry can be driven
//! deterministically (tests, replayed scenarios).
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Second resolution, matching the
/// resolution of `iat`/`exp` in issued tokens.
#[derive(Debug)]
pub struct ManualClock {
    unix_seconds: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            unix_seconds: AtomicI64::new(start.timestamp()),
        }
    }

    pub fn at_unix(seconds: i64) -> Self {
        Self {
            unix_seconds: AtomicI64::new(seconds),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.unix_seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.unix_seconds.store(at.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.unix_seconds.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}
