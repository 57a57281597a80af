// src/clock.rs

// clock module definition and implementations

// dependencies
use std::sync::OnceLock;
use std::time::{Duration, Instant};

// head start added to every relative reading so that a fresh `now()` is never close to zero
const ORIGIN_LEAD: Duration = Duration::from_secs(396 * 24 * 60 * 60);

static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Clock trait to abstract relative time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns a monotonic duration measured from an arbitrary, fixed origin.
/// It is only meaningful for elapsed-time arithmetic and is never wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;

    /// Time elapsed since `earlier`, or `None` if `earlier` lies ahead of `now`.
    fn since(&self, earlier: Duration) -> Option<Duration> {
        self.now().checked_sub(earlier)
    }
}

/// Duration since the process-wide relative origin.
pub fn relative_now() -> Duration {
    ORIGIN.get_or_init(Instant::now).elapsed() + ORIGIN_LEAD
}

/// Duration between `earlier` and [`relative_now`], `None` if `earlier` is in the future.
pub fn relative_since(earlier: Duration) -> Option<Duration> {
    relative_now().checked_sub(earlier)
}

/// RelativeClock implementation backed by `Instant`.
/// This is the default clock used by the rolling window and breakers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeClock;

impl Clock for RelativeClock {
    fn now(&self) -> Duration {
        relative_now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
