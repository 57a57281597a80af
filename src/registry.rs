// src/registry.rs

// name-keyed cache of breakers, owned by the caller rather than held in a global

// dependencies
use crate::adaptive::AdaptiveBreaker;
use crate::breaker::Breaker;
use crate::clock::{Clock, RelativeClock};
use crate::config::BreakerConfig;
use crate::errors::BreakerError;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Lazily creates and caches one [`Breaker`] per name.
/// Every breaker created by the registry shares its config and a clone of its clock.
/// We use `DashMap` for thread-safe concurrent access; concurrent first lookups of the
/// same name still yield a single instance.
#[derive(Debug)]
pub struct BreakerRegistry<C = RelativeClock>
where
    C: Clock + Clone,
{
    config: BreakerConfig,
    clock: C,
    breakers: DashMap<String, Arc<Breaker<C>>>,
}

impl<C> BreakerRegistry<C>
where
    C: Clock + Clone,
{
    /// Create a registry whose breakers use `config`, validated here once.
    pub fn with_config(config: BreakerConfig, clock: C) -> Result<Self, BreakerError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            breakers: DashMap::new(),
        })
    }

    /// Returns the breaker registered under `name`, creating it on first use.
    pub fn get(&self, name: &str) -> Result<Arc<Breaker<C>>, BreakerError> {
        if let Some(breaker) = self.breakers.get(name) {
            return Ok(Arc::clone(breaker.value()));
        }

        let entry = self
            .breakers
            .entry(name.to_owned())
            .or_try_insert_with(|| {
                let adaptive =
                    AdaptiveBreaker::with_config(self.config.clone(), self.clock.clone())?;
                tracing::debug!(breaker = name, "created breaker");
                Ok::<_, BreakerError>(Arc::new(Breaker::from_adaptive(name, adaptive)))
            })?;
        Ok(Arc::clone(entry.value()))
    }

    /// Replaces the breaker for `name` with one that always admits.
    pub fn disable(&self, name: &str) {
        tracing::debug!(breaker = name, "breaker disabled");
        self.breakers
            .insert(name.to_owned(), Arc::new(Breaker::disabled(name)));
    }

    /// Number of registered breakers
    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }

    /// [`Breaker::call`] on the breaker named `name`.
    pub fn call<T, E, R>(&self, name: &str, req: R) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        E: From<BreakerError> + fmt::Display,
    {
        self.get(name)?.call(req)
    }

    /// [`Breaker::call_with_acceptable`] on the breaker named `name`.
    pub fn call_with_acceptable<T, E, R, A>(
        &self,
        name: &str,
        req: R,
        acceptable: A,
    ) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        A: FnOnce(&Result<T, E>) -> bool,
        E: From<BreakerError> + fmt::Display,
    {
        self.get(name)?.call_with_acceptable(req, acceptable)
    }

    /// [`Breaker::call_with_fallback`] on the breaker named `name`.
    pub fn call_with_fallback<T, E, R, F>(&self, name: &str, req: R, fallback: F) -> Result<T, E>
    where
        R: FnOnce() -> Result<T, E>,
        F: FnOnce(BreakerError) -> Result<T, E>,
        E: From<BreakerError> + fmt::Display,
    {
        self.get(name)?.call_with_fallback(req, fallback)
    }

    /// [`Breaker::call_with_fallback_acceptable`] on the breaker named `name`.
    pub fn call_with_fallback_acceptable<T, E, R, F, A>(
        &self,
        name: &str,
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
        self.get(name)?
            .call_with_fallback_acceptable(req, fallback, acceptable)
    }
}

impl Default for BreakerRegistry<RelativeClock> {
    fn default() -> Self {
        Self {
            config: BreakerConfig::default(),
            clock: RelativeClock,
            breakers: DashMap::new(),
        }
    }
}
