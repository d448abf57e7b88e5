//! Issuance-order gate for search jobs.
//!
//! Only the most recently *started* job may render. A job that finishes after
//! a newer one started is discarded, whether or not the newer one finished.

use std::cell::Cell;
use std::time::Instant;

/// Issuance stamp of a search job. Later jobs compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobToken(u64);

impl JobToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Source of job timestamps.
pub trait JobClock {
    fn now(&self) -> u64;
}

/// Microseconds since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl JobClock for MonotonicClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

pub struct StalenessGuard<C = MonotonicClock> {
    clock: C,
    latest: Cell<u64>,
}

impl StalenessGuard<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for StalenessGuard<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: JobClock> StalenessGuard<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            latest: Cell::new(0),
        }
    }

    /// Stamp a new job as the latest one.
    ///
    /// Two jobs started within one clock tick still get distinct tokens, in
    /// issuance order.
    pub fn begin_job(&self) -> JobToken {
        let stamp = self.clock.now().max(self.latest.get() + 1);
        self.latest.set(stamp);
        JobToken(stamp)
    }

    pub fn is_superseded(&self, token: JobToken) -> bool {
        token.0 < self.latest.get()
    }

    pub fn latest(&self) -> JobToken {
        JobToken(self.latest.get())
    }
}
