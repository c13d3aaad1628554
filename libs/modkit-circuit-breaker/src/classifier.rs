/// Decides whether a failed call counts against the circuit.
///
/// The classifier never changes whether an error propagates; it only decides
/// if [`CircuitBreaker::report_failure`](crate::CircuitBreaker::report_failure)
/// is called for it. Any `Fn(&E) -> bool` closure is a classifier.
///
/// # Example
///
/// ```ignore
/// // Client-side errors say nothing about the upstream's health
/// let layer = CircuitBreakerLayer::new(breaker)
///     .with_classifier(|err: &ClientError| !matches!(err, ClientError::InvalidRequest(_)));
/// ```
pub trait FailureClassifier<E>: Send + Sync {
    /// Return `true` if `error` should be reported as a failure
    fn counts_as_failure(&self, error: &E) -> bool;
}

/// Default classifier: every failure counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysCount;

impl<E> FailureClassifier<E> for AlwaysCount {
    fn counts_as_failure(&self, _error: &E) -> bool {
        true
    }
}

impl<E, F> FailureClassifier<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn counts_as_failure(&self, error: &E) -> bool {
        self(error)
    }
}
