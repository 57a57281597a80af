// tests/breaker/main.rs

// test modules
mod fixtures;
mod config_tests;

// Re-export common test utilities
pub use fixtures::downstream_error::DownstreamError;
pub use fixtures::test_clock::TestClock;
