// src/errors.rs

// error handling for the flux breaker types

// dependencies
use thiserror::Error;

/// Error type for breaker construction and admission.
///
/// `ServiceUnavailable` is the rejection signal handed back when a breaker sheds a
/// request. The remaining variants are configuration errors raised at construction time.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakerError {
    #[error("circuit breaker is open")]
    ServiceUnavailable,
    #[error("bucket count must be greater than zero")]
    InvalidBucketCount,
    #[error("bucket interval must be greater than zero")]
    InvalidBucketInterval,
    #[error("weight factor must be a positive, finite number")]
    InvalidWeightFactor,
}

impl BreakerError {
    /// Returns true when this error is the admission rejection signal.
    pub fn is_rejection(&self) -> bool {
        matches!(self, BreakerError::ServiceUnavailable)
    }
}
