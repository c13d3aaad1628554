#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Circuit-breaker middleware for `ModKit` HTTP clients
//!
//! This crate provides a tower layer that guards outbound requests with an
//! external circuit breaker:
//! - Resolves a logical service name per request (request option or header)
//! - Asks the [`CircuitBreaker`] oracle whether the service is available
//! - Fails fast with [`CircuitOpenError`] when it is not, without dispatching
//! - Reports success or failure back to the oracle once the call resolves
//! - Pluggable failure classification and service name resolution
//!
//! The breaker state machine (thresholds, open/half-open transitions, timers)
//! is not part of this crate; plug in any implementation of [`CircuitBreaker`].
//!
//! # Service names
//!
//! | Source | Name | Priority |
//! |--------|------|----------|
//! | Request option | `circuit_breaker.requested_service_name` | 1 |
//! | Request header | `X-CB-Service-Name` (first value) | 2 |
//!
//! Requests without a (non-empty) service name pass through untouched.
//!
//! # Example
//!
//! ```ignore
//! use modkit_circuit_breaker::{CircuitBreakerLayer, CircuitOpenError, RequestOptions};
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let svc = ServiceBuilder::new()
//!     .layer(CircuitBreakerLayer::new(breaker))
//!     .service(transport);
//!
//! let req = http::Request::get("https://billing.internal/invoices")
//!     .extension(RequestOptions::for_service("billing"))
//!     .body(Full::new(Bytes::new()))?;
//!
//! match svc.oneshot(req).await {
//!     Err(err) if CircuitOpenError::find_in(&*err).is_some() => { /* not attempted */ }
//!     other => { /* attempted */ }
//! }
//! ```

mod breaker;
mod classifier;
mod error;
mod extractor;
mod handler;
mod layers;
mod options;

pub use breaker::CircuitBreaker;
pub use classifier::{AlwaysCount, FailureClassifier};
pub use error::CircuitOpenError;
pub use extractor::{DefaultServiceNameExtractor, RequestView, ServiceNameExtractor};
pub use handler::{HandlerFn, handler_fn};
pub use layers::{CircuitBreakerLayer, CircuitBreakerService};
pub use options::{REQUESTED_SERVICE_NAME_OPTION, RequestOptions, SERVICE_NAME_HEADER};
