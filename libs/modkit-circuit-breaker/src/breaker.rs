use std::sync::Arc;

/// Availability oracle consulted by [`CircuitBreakerLayer`](crate::CircuitBreakerLayer).
///
/// The breaker algorithm (failure counting, open/half-open transitions,
/// time windows) lives behind this trait. The middleware only asks whether a
/// service may be called and reports how the call went.
///
/// Implementations are shared by every in-flight request, so they must do
/// their own synchronization.
pub trait CircuitBreaker: Send + Sync {
    /// Whether requests to `service` may be dispatched right now
    fn is_available(&self, service: &str) -> bool;

    /// Record a successful call to `service`
    fn report_success(&self, service: &str);

    /// Record a failed call to `service`
    fn report_failure(&self, service: &str);
}

impl<T: CircuitBreaker + ?Sized> CircuitBreaker for Arc<T> {
    fn is_available(&self, service: &str) -> bool {
        (**self).is_available(service)
    }

    fn report_success(&self, service: &str) {
        (**self).report_success(service);
    }

    fn report_failure(&self, service: &str) {
        (**self).report_failure(service);
    }
}

impl<T: CircuitBreaker + ?Sized> CircuitBreaker for Box<T> {
    fn is_available(&self, service: &str) -> bool {
        (**self).is_available(service)
    }

    fn report_success(&self, service: &str) {
        (**self).report_success(service);
    }

    fn report_failure(&self, service: &str) {
        (**self).report_failure(service);
    }
}

impl<T: CircuitBreaker + ?Sized> CircuitBreaker for &T {
    fn is_available(&self, service: &str) -> bool {
        (**self).is_available(service)
    }

    fn report_success(&self, service: &str) {
        (**self).report_success(service);
    }

    fn report_failure(&self, service: &str) {
        (**self).report_failure(service);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingBreaker {
        successes: AtomicUsize,
        failures: AtomicUsize,
    }

    impl CircuitBreaker for CountingBreaker {
        fn is_available(&self, service: &str) -> bool {
            service != "down"
        }

        fn report_success(&self, _service: &str) {
            self.successes.fetch_add(1, Ordering::SeqCst);
        }

        fn report_failure(&self, _service: &str) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn exercise(breaker: &dyn CircuitBreaker) {
        assert!(breaker.is_available("up"));
        assert!(!breaker.is_available("down"));
        breaker.report_success("up");
        breaker.report_failure("up");
    }

    #[test]
    fn test_forwarding_impls_reach_inner_breaker() {
        let inner = Arc::new(CountingBreaker::default());

        let shared: Arc<dyn CircuitBreaker> = inner.clone();
        exercise(&shared);

        let nested = Arc::new(inner.clone());
        exercise(&nested);

        let borrowed = &*inner;
        exercise(&borrowed);

        assert_eq!(inner.successes.load(Ordering::SeqCst), 3);
        assert_eq!(inner.failures.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_boxed_breaker() {
        let boxed: Box<dyn CircuitBreaker> = Box::new(CountingBreaker::default());
        assert!(boxed.is_available("up"));
        assert!(!boxed.is_available("down"));
    }
}
