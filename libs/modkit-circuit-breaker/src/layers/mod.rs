//! Tower layers for outbound request protection
//!
//! ## Available Layers
//!
//! - [`CircuitBreakerLayer`] - Consults a [`CircuitBreaker`](crate::CircuitBreaker)
//!   oracle before dispatch and reports the outcome afterwards

mod circuit_breaker;

pub use circuit_breaker::{CircuitBreakerLayer, CircuitBreakerService};
