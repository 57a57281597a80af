// tests/breaker/fixtures/mod.rs

pub mod downstream_error;
pub mod test_clock;

// dependencies
use flux_breaker::{AdaptiveBreaker, BreakerConfig, ProbabilityGate};
use std::sync::Arc;
use test_clock::TestClock;

// breaker with a reproducible rejection sequence
pub fn seeded_breaker(config: BreakerConfig, clock: TestClock) -> AdaptiveBreaker<TestClock> {
    AdaptiveBreaker::with_config(config, clock)
        .unwrap()
        .with_gate(Arc::new(ProbabilityGate::with_seed(2024)))
}

// records `accepts` successes and `total - accepts` failures
pub fn record(breaker: &AdaptiveBreaker<TestClock>, accepts: u64, total: u64) {
    for _ in 0..accepts {
        breaker.mark_success();
    }
    for _ in accepts..total {
        breaker.mark_failure();
    }
}
