// tests/breaker/fixtures/test_clock.rs

// dependencies
use flux_breaker::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// Test clock implementation, starts well away from zero like the relative clock does
#[derive(Debug, Clone)]
pub struct TestClock {
    time: Arc<AtomicU64>, // Store as nanos
}

impl TestClock {
    pub fn new() -> Self {
        Self::at(Duration::from_secs(3_600))
    }

    pub fn at(start: Duration) -> Self {
        Self {
            time: Arc::new(AtomicU64::new(start.as_nanos() as u64)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.time.fetch_add(by.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn set_time(&self, to: Duration) {
        self.time.store(to.as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time.load(Ordering::Relaxed))
    }
}
