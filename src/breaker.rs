// src/breaker.rs

// named breaker facade: the surface application code talks to

// dependencies
use crate::adaptive::{AdaptiveBreaker, Permit};
use crate::clock::{Clock, RelativeClock};
use crate::config::BreakerConfig;
use crate::errors::BreakerError;
use parking_lot::Mutex;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::VecDeque;
use std::fmt;

const NAME_LEN: usize = 8;
const RECENT_ERRORS: usize = 5;

/// A named circuit breaker.
///
/// Wraps an [`AdaptiveBreaker`] with a name, remembers the last few failure reasons so a
/// drop can be logged with context, and can be switched to a no-op mode that admits
/// everything (see [`Breaker::disabled`]).
#[derive(Debug)]
pub struct Breaker<C = RelativeClock>
where
    C: Clock,
{
    name: String,
    throttle: Throttle<C>,
}

#[derive(Debug)]
enum Throttle<C>
where
    C: Clock,
{
    Adaptive {
        breaker: AdaptiveBreaker<C>,
        errors: ErrorWindow,
    },
    NoOp,
}

impl<C> Breaker<C>
where
    C: Clock,
{
    /// Create a breaker from a config object. The breaker gets a random name
    /// until [`named`](Self::named) is used.
    pub fn with_config(config: BreakerConfig, clock: C) -> Result<Self, BreakerError> {
        Ok(Self::from_adaptive(
            random_name(),
            AdaptiveBreaker::with_config(config, clock)?,
        ))
    }

    /// Wrap an already constructed adaptive breaker under `name`.
    pub fn from_adaptive(name: impl Into<String>, breaker: AdaptiveBreaker<C>) -> Self {
        Self {
            name: name.into(),
            throttle: Throttle::Adaptive {
                breaker,
                errors: ErrorWindow::default(),
            },
        }
    }

    /// A breaker that admits every request and records nothing.
    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            throttle: Throttle::NoOp,
        }
    }

    /// Builder-style: set the breaker name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.throttle, Throttle::NoOp)
    }

    /// Weighted successes and total attempts in the current window; zero when disabled.
    pub fn history(&self) -> (i64, i64) {
        match &self.throttle {
            Throttle::Adaptive { breaker, .. } => breaker.history(),
            Throttle::NoOp => (0, 0),
        }
    }

    /// Current rejection probability; zero when disabled.
    pub fn drop_ratio(&self) -> f64 {
        match &self.throttle {
            Throttle::Adaptive { breaker, .. } => breaker.drop_ratio(),
            Throttle::NoOp => 0.0,
        }
    }

    /// Checks admission and hands back a [`Promise`] to report the outcome on.
    pub fn allow(&self) -> Result<Promise<'_, C>, BreakerError> {
        match &self.throttle {
            Throttle::Adaptive { breaker, errors } => match breaker.allow() {
                Ok(permit) => Ok(Promise {
                    inner: Some((permit, errors)),
                }),
                Err(err) => {
                    self.log_drop(breaker, errors);
                    Err(err)
                }
            },
            Throttle::NoOp => Ok(Promise { inner: None }),
        }
    }

    /// Runs `req` if admitted. Any `Err` counts as a failure.
    pub fn call<T, E, R>(&self, req: R) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        E: From<BreakerError> + fmt::Display,
    {
        self.call_with_fallback_acceptable(
            req,
            None::<fn(BreakerError) -> Result<T, E>>,
            Result::is_ok,
        )
    }

    /// Runs `req` if admitted, counting it as a success when `acceptable` says so.
    pub fn call_with_acceptable<T, E, R, A>(&self, req: R, acceptable: A) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        A: FnOnce(&Result<T, E>) -> bool,
        E: From<BreakerError> + fmt::Display,
    {
        self.call_with_fallback_acceptable(
            req,
            None::<fn(BreakerError) -> Result<T, E>>,
            acceptable,
        )
    }

    /// Runs `req` if admitted, otherwise returns whatever `fallback` makes of the rejection.
    pub fn call_with_fallback<T, E, R, F>(&self, req: R, fallback: F) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        F: FnOnce(BreakerError) -> Result<T, E>,
        E: From<BreakerError> + fmt::Display,
    {
        self.call_with_fallback_acceptable(req, Some(fallback), Result::is_ok)
    }

    /// General form of the `call*` family.
    pub fn call_with_fallback_acceptable<T, E, R, F, A>(
        &self,
        req: R,
        fallback: Option<F>,
        acceptable: A,
    ) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        F: FnOnce(BreakerError) -> Result<T, E>,
        A: FnOnce(&Result<T, E>) -> bool,
        E: From<BreakerError> + fmt::Display,
    {
        let (breaker, errors) = match &self.throttle {
            Throttle::Adaptive { breaker, errors } => (breaker, errors),
            Throttle::NoOp => return req(),
        };

        let on_reject = |err: BreakerError| {
            self.log_drop(breaker, errors);
            match fallback {
                Some(fallback) => fallback(err),
                None => Err(err.into()),
            }
        };
        let classify = |result: &Result<T, E>| {
            let ok = acceptable(result);
            if !ok {
                if let Err(err) = result {
                    errors.add(err.to_string());
                }
            }
            ok
        };

        breaker.wrapped_call(req, Some(on_reject), classify)
    }

    fn log_drop(&self, breaker: &AdaptiveBreaker<C>, errors: &ErrorWindow) {
        tracing::warn!(
            breaker = %self.name,
            drop_ratio = breaker.drop_ratio(),
            last_errors = %errors,
            "breaker is open and requests dropped"
        );
    }
}

/// Handle for a request admitted by a [`Breaker`].
#[must_use = "an admitted request should report its outcome"]
#[derive(Debug)]
pub struct Promise<'a, C = RelativeClock>
where
    C: Clock,
{
    // None for a disabled breaker
    inner: Option<(Permit<'a, C>, &'a ErrorWindow)>,
}

impl<C> Promise<'_, C>
where
    C: Clock,
{
    /// Marks the request as successful.
    pub fn accept(self) {
        if let Some((permit, _)) = self.inner {
            permit.accept();
        }
    }

    /// Marks the request as failed, keeping `reason` among the recent errors.
    pub fn reject(self, reason: impl Into<String>) {
        if let Some((permit, errors)) = self.inner {
            errors.add(reason.into());
            permit.reject();
        }
    }
}

// the most recent failure reasons, newest first when displayed
#[derive(Debug, Default)]
struct ErrorWindow {
    reasons: Mutex<VecDeque<String>>,
}

impl ErrorWindow {
    fn add(&self, reason: String) {
        let mut reasons = self.reasons.lock();
        if reasons.len() == RECENT_ERRORS {
            reasons.pop_front();
        }
        reasons.push_back(reason);
    }
}

impl fmt::Display for ErrorWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons = self.reasons.lock();
        for (i, reason) in reasons.iter().rev().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(reason)?;
        }
        Ok(())
    }
}

fn random_name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NAME_LEN)
        .map(char::from)
        .collect()
}
