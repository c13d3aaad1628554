use std::error::Error;
use thiserror::Error;

/// Error returned when the circuit breaker rejects a request before dispatch.
///
/// Produced only by [`CircuitBreakerService`](crate::CircuitBreakerService)
/// when the oracle reports the service as unavailable. The request was never
/// sent, so callers can tell it apart from transport failures and pick a
/// different retry/backoff policy.
///
/// # Example
///
/// ```ignore
/// match client.call(req).await {
///     Err(err) if CircuitOpenError::find_in(&*err).is_some() => {
///         // never attempted; fail over or back off
///     }
///     other => other,
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("circuit is open for service \"{service}\"")]
pub struct CircuitOpenError {
    service: String,
}

impl CircuitOpenError {
    /// Create an error for the given service name
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Name of the service whose circuit is open
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Walk the source chain of `err` and return the first `CircuitOpenError`.
    ///
    /// Works for `tower::BoxError` as well as typed errors that wrap this one
    /// with `#[from]`/`#[source]`.
    #[must_use]
    pub fn find_in<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Self> {
        let mut current: Option<&(dyn Error + 'static)> = Some(err);
        while let Some(e) = current {
            if let Some(found) = e.downcast_ref::<Self>() {
                return Some(found);
            }
            current = e.source();
        }
        None
    }
}
