// src/config.rs

//! Configuration types for the flux breaker

// dependencies
use crate::errors::BreakerError;
use std::time::Duration;

const DEFAULT_WINDOW: Duration = Duration::from_secs(10);
const DEFAULT_BUCKETS: usize = 40;
const DEFAULT_WEIGHT_FACTOR: f64 = 1.5;
const DEFAULT_PROTECTION: u64 = 5;

/// Configuration for breaker behavior.
///
/// The defaults describe a 10 second window split into 40 buckets of 250ms,
/// a weight factor of 1.5 and a protection threshold of 5 requests.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    pub(crate) window: Duration,
    pub(crate) buckets: usize,
    pub(crate) weight_factor: f64,
    pub(crate) protection: u64,
    pub(crate) ignore_current: bool,
}

impl BreakerConfig {
    /// Create a configuration with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: set the total window covered by the statistics
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Builder-style: set the number of buckets the window is split into
    pub fn buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets;
        self
    }

    /// Builder-style: set the multiplier applied to recent successes
    pub fn weight_factor(mut self, k: f64) -> Self {
        self.weight_factor = k;
        self
    }

    /// Builder-style: set how many requests are exempt from rejection pressure
    pub fn protection(mut self, protection: u64) -> Self {
        self.protection = protection;
        self
    }

    /// Builder-style: leave the still-filling current bucket out of the statistics
    pub fn ignore_current_bucket(mut self, ignore: bool) -> Self {
        self.ignore_current = ignore;
        self
    }

    /// Width of a single bucket
    pub fn bucket_interval(&self) -> Duration {
        match u32::try_from(self.buckets) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(buckets) => self.window / buckets,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), BreakerError> {
        if self.buckets == 0 {
            return Err(BreakerError::InvalidBucketCount);
        }
        if self.bucket_interval().is_zero() {
            return Err(BreakerError::InvalidBucketInterval);
        }
        if !self.weight_factor.is_finite() || self.weight_factor <= 0.0 {
            return Err(BreakerError::InvalidWeightFactor);
        }
        Ok(())
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            buckets: DEFAULT_BUCKETS,
            weight_factor: DEFAULT_WEIGHT_FACTOR,
            protection: DEFAULT_PROTECTION,
            ignore_current: false,
        }
    }
}
