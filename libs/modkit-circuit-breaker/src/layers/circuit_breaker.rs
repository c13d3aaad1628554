use crate::breaker::CircuitBreaker;
use crate::classifier::{AlwaysCount, FailureClassifier};
use crate::error::CircuitOpenError;
use crate::extractor::{DefaultServiceNameExtractor, RequestView, ServiceNameExtractor};
use http::Request;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that guards outbound requests with an external circuit breaker
///
/// For every request with a resolvable service name the layer asks the
/// [`CircuitBreaker`] oracle whether the service is available:
/// - unavailable: the inner service is not called and the request fails with
///   [`CircuitOpenError`]
/// - available: the request is forwarded, then `report_success` or
///   `report_failure` is called once the outcome is known
///
/// Requests without a service name pass through untouched. The service name
/// comes from the `circuit_breaker.requested_service_name` option or the
/// `X-CB-Service-Name` header unless a custom extractor is installed.
///
/// # Example
///
/// ```ignore
/// use modkit_circuit_breaker::{CircuitBreakerLayer, CircuitOpenError};
/// use tower::ServiceBuilder;
///
/// let svc = ServiceBuilder::new()
///     .layer(
///         CircuitBreakerLayer::new(breaker)
///             .with_classifier(|err: &BoxError| !err.is::<CircuitOpenError>()),
///     )
///     .service(transport);
/// ```
pub struct CircuitBreakerLayer<C = AlwaysCount, X = DefaultServiceNameExtractor> {
    breaker: Arc<dyn CircuitBreaker>,
    classifier: Arc<C>,
    extractor: Arc<X>,
}

impl CircuitBreakerLayer {
    /// Create a layer that counts every failure and resolves service names
    /// from the request options or header
    #[must_use]
    pub fn new(breaker: Arc<dyn CircuitBreaker>) -> Self {
        Self {
            breaker,
            classifier: Arc::new(AlwaysCount),
            extractor: Arc::new(DefaultServiceNameExtractor),
        }
    }
}

impl<C, X> CircuitBreakerLayer<C, X> {
    /// Replace the failure classifier
    ///
    /// Failures the classifier rejects still propagate to the caller; they are
    /// just not reported to the circuit breaker.
    #[must_use]
    pub fn with_classifier<C2>(self, classifier: C2) -> CircuitBreakerLayer<C2, X> {
        CircuitBreakerLayer {
            breaker: self.breaker,
            classifier: Arc::new(classifier),
            extractor: self.extractor,
        }
    }

    /// Replace the built-in service name resolution
    #[must_use]
    pub fn with_service_name_extractor<X2>(self, extractor: X2) -> CircuitBreakerLayer<C, X2>
    where
        X2: ServiceNameExtractor,
    {
        CircuitBreakerLayer {
            breaker: self.breaker,
            classifier: self.classifier,
            extractor: Arc::new(extractor),
        }
    }

    /// Replace the built-in service name resolution with a closure
    #[must_use]
    pub fn with_service_name_fn<F>(self, extract: F) -> CircuitBreakerLayer<C, F>
    where
        F: Fn(RequestView<'_>) -> Option<String> + Send + Sync,
    {
        self.with_service_name_extractor(extract)
    }
}

impl<C, X> Clone for CircuitBreakerLayer<C, X> {
    fn clone(&self) -> Self {
        Self {
            breaker: Arc::clone(&self.breaker),
            classifier: Arc::clone(&self.classifier),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<S, C, X> Layer<S> for CircuitBreakerLayer<C, X> {
    type Service = CircuitBreakerService<S, C, X>;

    fn layer(&self, inner: S) -> Self::Service {
        CircuitBreakerService {
            inner,
            breaker: Arc::clone(&self.breaker),
            classifier: Arc::clone(&self.classifier),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

/// Service that consults the circuit breaker around each request
pub struct CircuitBreakerService<S, C = AlwaysCount, X = DefaultServiceNameExtractor> {
    inner: S,
    breaker: Arc<dyn CircuitBreaker>,
    classifier: Arc<C>,
    extractor: Arc<X>,
}

impl<S: Clone, C, X> Clone for CircuitBreakerService<S, C, X> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            breaker: Arc::clone(&self.breaker),
            classifier: Arc::clone(&self.classifier),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<S, C, X, ReqBody> Service<Request<ReqBody>> for CircuitBreakerService<S, C, X>
where
    S: Service<Request<ReqBody>>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: From<CircuitOpenError> + Send + 'static,
    C: FailureClassifier<S::Error> + 'static,
    X: ServiceNameExtractor,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let Some(service) = self
            .extractor
            .extract(RequestView::new(&req))
            .filter(|name| !name.is_empty())
        else {
            return Box::pin(self.inner.call(req));
        };

        if !self.breaker.is_available(&service) {
            tracing::debug!(service = %service, "Circuit open, request rejected without dispatch");
            let err = S::Error::from(CircuitOpenError::new(service));
            return Box::pin(std::future::ready(Err::<S::Response, S::Error>(err)));
        }

        // Dispatch before returning so the availability check strictly
        // precedes the call, even if the caller polls the future later.
        let response = self.inner.call(req);
        let breaker = Arc::clone(&self.breaker);
        let classifier = Arc::clone(&self.classifier);

        Box::pin(async move {
            match response.await {
                Ok(resp) => {
                    tracing::trace!(service = %service, "Reporting success to circuit breaker");
                    breaker.report_success(&service);
                    Ok(resp)
                }
                Err(err) => {
                    if classifier.counts_as_failure(&err) {
                        tracing::trace!(service = %service, "Reporting failure to circuit breaker");
                        breaker.report_failure(&service);
                    } else {
                        tracing::trace!(service = %service, "Failure not counted by classifier");
                    }
                    Err(err)
                }
            }
        })
    }
}
