use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of nanosecond timestamps for record ids, nonces and record times.
///
/// Implementations must return strictly increasing values so that two
/// operations in one process never derive the same id or nonce.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> i64;
}

/// Wall clock, bumped by one nanosecond whenever the system clock stalls or
/// steps backwards.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        let wall = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Deterministic clock for tests: yields `start`, `start + step`, ...
#[derive(Debug)]
pub struct ManualClock {
    next: AtomicI64,
    step: i64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self::with_step(start, 1)
    }

    pub fn with_step(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step: step.max(1),
        }
    }

    /// Skip ahead without producing a tick.
    pub fn advance(&self, nanos: i64) {
        self.next.fetch_add(nanos.max(0), Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::AcqRel)
    }
}
