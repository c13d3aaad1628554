use crate::options::RequestOptions;
use http::Request;
use std::future::Future;
use std::task::{Context, Poll};
use tower::Service;

/// Adapt a `(request, options) -> future` function into a terminal tower service.
///
/// The function receives the request unchanged together with a copy of its
/// [`RequestOptions`] extension (empty when the request has none). Stack the
/// circuit breaker and any other layers on top with `tower::ServiceBuilder`.
///
/// # Example
///
/// ```ignore
/// let transport = handler_fn(|req: Request<Full<Bytes>>, options: RequestOptions| async move {
///     client.send(req, options).await
/// });
/// let svc = ServiceBuilder::new()
///     .layer(CircuitBreakerLayer::new(breaker))
///     .service(transport);
/// ```
#[must_use]
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

/// Service returned by [`handler_fn`]
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

impl<F, Fut, B, T, E> Service<Request<B>> for HandlerFn<F>
where
    F: FnMut(Request<B>, RequestOptions) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    type Response = T;
    type Error = E;
    type Future = Fut;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let options = req
            .extensions()
            .get::<RequestOptions>()
            .cloned()
            .unwrap_or_default();
        (self.f)(req, options)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::options::REQUESTED_SERVICE_NAME_OPTION;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_handler_receives_request_and_options() {
        let handler = handler_fn(|req: Request<&'static str>, options: RequestOptions| async move {
            Ok::<_, std::convert::Infallible>(format!(
                "{} {} {:?}",
                req.uri().path(),
                req.body(),
                options.get_str(REQUESTED_SERVICE_NAME_OPTION)
            ))
        });

        let req = Request::get("http://example.com/orders")
            .extension(RequestOptions::for_service("orders"))
            .body("body")
            .unwrap();

        let out = handler.oneshot(req).await.unwrap();
        assert_eq!(out, "/orders body Some(\"orders\")");
    }

    #[tokio::test]
    async fn test_missing_options_are_empty() {
        let handler = handler_fn(|_req: Request<()>, options: RequestOptions| async move {
            Ok::<_, std::convert::Infallible>(options.is_empty())
        });

        let req = Request::get("http://example.com").body(()).unwrap();
        assert!(handler.oneshot(req).await.unwrap());
    }

    #[tokio::test]
    async fn test_extension_stays_on_request() {
        let handler = handler_fn(|req: Request<()>, _options: RequestOptions| async move {
            Ok::<_, std::convert::Infallible>(req.extensions().get::<RequestOptions>().is_some())
        });

        let req = Request::get("http://example.com")
            .extension(RequestOptions::for_service("orders"))
            .body(())
            .unwrap();
        assert!(handler.oneshot(req).await.unwrap());
    }
}
