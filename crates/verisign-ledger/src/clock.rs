use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use verisign_registry::LogicalTime;

/// Source of commit time for the ledger.
pub trait Clock: Send + Sync {
    /// Current time as observed by the host.
    fn now(&self) -> LogicalTime;
}

/// Wall clock in whole UTC seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LogicalTime {
        // Clamp pre-epoch system clocks to the epoch.
        let secs = Utc::now().timestamp().max(0) as u64;
        LogicalTime::from_secs(secs)
    }
}

/// Settable clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    /// Creates a clock stopped at `start`.
    pub fn new(start: LogicalTime) -> Self {
        Self {
            secs: AtomicU64::new(start.as_secs()),
        }
    }

    /// Moves the clock to `time`, backwards included.
    pub fn set(&self, time: LogicalTime) {
        self.secs.store(time.as_secs(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LogicalTime {
        LogicalTime::from_secs(self.secs.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> LogicalTime {
        (**self).now()
    }
}
