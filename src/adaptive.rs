// src/adaptive.rs

// adaptive admission control: turns recent outcome statistics into a drop probability

// dependencies
use crate::clock::{Clock, RelativeClock};
use crate::config::BreakerConfig;
use crate::errors::BreakerError;
use crate::probability::ProbabilityGate;
use crate::rolling_window::RollingWindow;
use std::sync::Arc;

const SUCCESS: f64 = 1.0;
const FAILURE: f64 = 0.0;

/// Client-side adaptive throttling breaker.
///
/// There are no open, half-open or closed states. Each call looks at the outcomes
/// recorded during the last window and rejects with probability
///
/// ```text
/// max(0, (total - protection - k * accepts) / (total + 1))
/// ```
///
/// so that failures decay out of the window instead of flipping the breaker.
/// C is the clock type, defaulting to RelativeClock.
#[derive(Debug)]
pub struct AdaptiveBreaker<C = RelativeClock>
where
    C: Clock,
{
    k: f64,
    protection: u64,
    stat: RollingWindow<C>,
    gate: Arc<ProbabilityGate>,
}

impl<C> AdaptiveBreaker<C>
where
    C: Clock,
{
    /// Create a breaker from a config object, validating it first
    pub fn with_config(config: BreakerConfig, clock: C) -> Result<Self, BreakerError> {
        config.validate()?;
        let stat = RollingWindow::new(config.buckets, config.bucket_interval(), clock)?
            .ignore_current_bucket(config.ignore_current);

        Ok(Self {
            k: config.weight_factor,
            protection: config.protection,
            stat,
            gate: Arc::new(ProbabilityGate::new()),
        })
    }

    /// Builder-style: draw rejection decisions from `gate` instead of a private source
    pub fn with_gate(mut self, gate: Arc<ProbabilityGate>) -> Self {
        self.gate = gate;
        self
    }

    // accessor method to return the weight factor
    pub fn weight_factor(&self) -> f64 {
        self.k
    }

    // accessor method to return the protection threshold
    pub fn protection(&self) -> u64 {
        self.protection
    }

    /// Weighted successes and total attempts recorded in the current window.
    pub fn history(&self) -> (i64, i64) {
        let mut accepts = 0;
        let mut total = 0;
        self.stat.reduce(|b| {
            accepts += b.sum as i64;
            total += b.count;
        });
        (accepts, total)
    }

    /// Probability with which the next request will be rejected.
    pub fn drop_ratio(&self) -> f64 {
        let (accepts, total) = self.history();
        drop_ratio(self.k, self.protection, accepts, total)
    }

    /// Admission check only: `Ok(())` to proceed, `ServiceUnavailable` to shed.
    /// Nothing is recorded; a rejection does not count as a failure.
    pub fn accept(&self) -> Result<(), BreakerError> {
        let ratio = self.drop_ratio();
        if ratio <= 0.0 {
            return Ok(());
        }

        if self.gate.true_on_proba(ratio) {
            return Err(BreakerError::ServiceUnavailable);
        }

        Ok(())
    }

    /// Admission check returning a [`Permit`] on which the caller reports the outcome.
    pub fn allow(&self) -> Result<Permit<'_, C>, BreakerError> {
        self.accept()?;
        Ok(Permit { breaker: self })
    }

    /// Runs `req` if admitted and records its outcome.
    ///
    /// On rejection `fallback` is invoked with the rejection signal; without a fallback the
    /// signal is converted into `E`. After admission the result is classified by
    /// `acceptable` and returned unchanged. If `req` (or `acceptable`) panics, a failure is
    /// recorded while unwinding and the panic continues untouched.
    pub fn wrapped_call<T, E, R, F, A>(
        &self,
        req: R,
        fallback: Option<F>,
        acceptable: A,
    ) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        F: FnOnce(BreakerError) -> Result<T, E>,
        A: FnOnce(&Result<T, E>) -> bool,
        E: From<BreakerError>,
    {
        if let Err(err) = self.accept() {
            return match fallback {
                Some(fallback) => fallback(err),
                None => Err(err.into()),
            };
        }

        let guard = FailureGuard::new(self);
        let result = req();
        let ok = acceptable(&result);
        guard.disarm();

        if ok {
            self.mark_success();
        } else {
            self.mark_failure();
        }

        result
    }

    /// Records a successful attempt.
    pub fn mark_success(&self) {
        self.stat.add(SUCCESS);
    }

    /// Records a failed attempt.
    pub fn mark_failure(&self) {
        self.stat.add(FAILURE);
    }
}

// (total - protection - k * accepts) / (total + 1), floored at zero
pub(crate) fn drop_ratio(k: f64, protection: u64, accepts: i64, total: i64) -> f64 {
    let weighted_accepts = k * accepts as f64;
    let ratio = (total as f64 - protection as f64 - weighted_accepts) / (total as f64 + 1.0);
    ratio.max(0.0)
}

/// Handle for an admitted request. Consume it with [`accept`](Self::accept) or
/// [`reject`](Self::reject) once the outcome is known.
#[must_use = "an admitted request should report its outcome"]
#[derive(Debug)]
pub struct Permit<'a, C = RelativeClock>
where
    C: Clock,
{
    breaker: &'a AdaptiveBreaker<C>,
}

impl<C> Permit<'_, C>
where
    C: Clock,
{
    /// Marks the request as successful.
    pub fn accept(self) {
        self.breaker.mark_success();
    }

    /// Marks the request as failed.
    pub fn reject(self) {
        self.breaker.mark_failure();
    }
}

// records a failure when dropped while still armed, i.e. on unwind
struct FailureGuard<'a, C>
where
    C: Clock,
{
    breaker: &'a AdaptiveBreaker<C>,
    armed: bool,
}

impl<'a, C> FailureGuard<'a, C>
where
    C: Clock,
{
    fn new(breaker: &'a AdaptiveBreaker<C>) -> Self {
        Self {
            breaker,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<C> Drop for FailureGuard<'_, C>
where
    C: Clock,
{
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("wrapped request unwound, recording failure");
            self.breaker.mark_failure();
        }
    }
}
