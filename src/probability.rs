// src/probability.rs

// shared random source used to turn a drop ratio into a yes/no decision

// dependencies
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Returns `true` with a given probability.
/// The generator sits behind a mutex so one gate can be shared across threads and breakers;
/// each draw holds the lock only for a single `f64` sample.
#[derive(Debug)]
pub struct ProbabilityGate {
    rng: Mutex<StdRng>,
}

impl ProbabilityGate {
    /// Create a gate seeded from operating system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a gate with a fixed seed, producing a reproducible sequence of draws.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Returns `true` with probability `proba`.
    /// Callers keep `proba` within `[0, 1]`; values outside simply saturate.
    pub fn true_on_proba(&self, proba: f64) -> bool {
        let draw: f64 = self.rng.lock().gen_range(0.0..1.0);
        draw < proba
    }
}

impl Default for ProbabilityGate {
    fn default() -> Self {
        Self::new()
    }
}
