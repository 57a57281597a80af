// src/lib.rs

//! # Flux Breaker
//!
//! An adaptive client-side circuit breaker. Outcomes of recent calls are kept in a
//! time-bucketed rolling window and turned into a rejection probability, so a struggling
//! dependency sees less traffic as its failure rate climbs and more as it recovers.
//! There are no open/half-open/closed states to tune.
//!
//! Three calling conventions are offered:
//!
//! - check-only: [`AdaptiveBreaker::accept`]
//! - permit: [`Breaker::allow`] returning a [`Promise`] to report the outcome on
//! - wrapped call: [`Breaker::call`] and its fallback/acceptable variants
//!
//! ## Quick Example
//!
//! ```rust
//! use flux_breaker::{BreakerError, BreakerRegistry};
//!
//! let registry: BreakerRegistry = BreakerRegistry::default();
//!
//! let result: Result<u32, BreakerError> = registry.call("inventory", || {
//!     // talk to the downstream service here
//!     Ok(42)
//! });
//! assert_eq!(result.unwrap(), 42);
//!
//! let breaker = registry.get("inventory").unwrap();
//! match breaker.allow() {
//!     Ok(promise) => promise.accept(),
//!     Err(err) => println!("shed: {err}"),
//! }
//! ```

// private modules
mod adaptive;
mod breaker;
mod clock;
mod config;
mod errors;
mod probability;
mod registry;
mod rolling_window;

// public API exports
pub use adaptive::{AdaptiveBreaker, Permit};
pub use breaker::{Breaker, Promise};
pub use clock::{Clock, RelativeClock, relative_now, relative_since};
pub use config::BreakerConfig;
pub use errors::BreakerError;
pub use probability::ProbabilityGate;
pub use registry::BreakerRegistry;
pub use rolling_window::{Bucket, RollingWindow};
