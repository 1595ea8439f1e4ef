//! Time source for message timestamps
//!
//! Logs never read the clock directly. They go through [`Clock`] so tests can
//! pin time, and through [`MonotonicStamper`] so that two appends landing in the
//! same millisecond (or a wall clock stepping backwards) still produce strictly
//! increasing timestamps.

use super::types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Timestamp;
}

/// Reads the operating system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Timestamp(millis)
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: AtomicU64::new(start.as_millis()),
        }
    }

    pub fn set(&self, ts: Timestamp) {
        self.millis.store(ts.as_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }
}

/// Shared handle to a clock
pub type SharedClock = Arc<dyn Clock>;

/// Per-log timestamp allocator: `max(clock, previous + 1ms)`
///
/// Not synchronized; the owning log is only mutated under its channel's write
/// lock.
#[derive(Debug, Clone)]
pub struct MonotonicStamper {
    clock: SharedClock,
    last: Option<Timestamp>,
}

impl MonotonicStamper {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock, last: None }
    }

    /// Allocate the next timestamp, strictly greater than every earlier one
    pub fn stamp(&mut self) -> Timestamp {
        let now = self.clock.now();
        let ts = match self.last {
            Some(last) if now <= last => last.next(),
            _ => now,
        };
        self.last = Some(ts);
        ts
    }

    /// Most recently allocated timestamp
    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }
}
