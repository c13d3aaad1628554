use crate::options::{REQUESTED_SERVICE_NAME_OPTION, RequestOptions, SERVICE_NAME_HEADER};
use http::{HeaderMap, Method, Request, Uri};

static EMPTY_OPTIONS: std::sync::LazyLock<RequestOptions> =
    std::sync::LazyLock::new(RequestOptions::new);

/// Borrowed view of an outbound request handed to a [`ServiceNameExtractor`].
///
/// Exposes the parts a name can be derived from without tying extractors to
/// the request body type.
#[derive(Clone, Copy, Debug)]
pub struct RequestView<'a> {
    method: &'a Method,
    uri: &'a Uri,
    headers: &'a HeaderMap,
    options: &'a RequestOptions,
}

impl<'a> RequestView<'a> {
    /// Build a view of `request`, reading its [`RequestOptions`] extension
    #[must_use]
    pub fn new<B>(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
            options: request
                .extensions()
                .get::<RequestOptions>()
                .unwrap_or(&*EMPTY_OPTIONS),
        }
    }

    #[must_use]
    pub fn method(&self) -> &'a Method {
        self.method
    }

    #[must_use]
    pub fn uri(&self) -> &'a Uri {
        self.uri
    }

    #[must_use]
    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    /// Per-call options; empty when the request carries none
    #[must_use]
    pub fn options(&self) -> &'a RequestOptions {
        self.options
    }

    /// First value of header `name`, if present and valid UTF-8
    #[must_use]
    pub fn first_header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .get_all(name)
            .iter()
            .next()
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
    }
}

/// Resolves the logical service name of a request.
///
/// Returning `None` (or an empty name) turns the circuit breaker into a
/// pass-through for that request. Closures of the form
/// `Fn(RequestView<'_>) -> Option<String>` implement this trait.
pub trait ServiceNameExtractor: Send + Sync {
    fn extract(&self, request: RequestView<'_>) -> Option<String>;
}

/// Built-in resolution: the [`REQUESTED_SERVICE_NAME_OPTION`] option first,
/// then the first [`SERVICE_NAME_HEADER`] value.
///
/// Empty values and non-string option values count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultServiceNameExtractor;

impl ServiceNameExtractor for DefaultServiceNameExtractor {
    fn extract(&self, request: RequestView<'_>) -> Option<String> {
        request
            .options()
            .get_str(REQUESTED_SERVICE_NAME_OPTION)
            .filter(|name| !name.is_empty())
            .or_else(|| {
                request
                    .first_header(SERVICE_NAME_HEADER)
                    .filter(|name| !name.is_empty())
            })
            .map(ToOwned::to_owned)
    }
}

impl<F> ServiceNameExtractor for F
where
    F: Fn(RequestView<'_>) -> Option<String> + Send + Sync,
{
    fn extract(&self, request: RequestView<'_>) -> Option<String> {
        self(request)
    }
}
