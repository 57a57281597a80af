// tests/breaker/fixtures/downstream_error.rs

// dependencies
use flux_breaker::BreakerError;
use thiserror::Error;

// error type returned by the fake downstream calls in the tests
#[derive(Debug, Error, PartialEq)]
pub enum DownstreamError {
    #[error("breaker: {0}")]
    Breaker(#[from] BreakerError),
    #[error("downstream timed out")]
    Timeout,
    #[error("not found")]
    NotFound,
}
