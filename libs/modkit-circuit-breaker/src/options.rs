use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Header carrying the logical service name of an outbound request
pub const SERVICE_NAME_HEADER: &str = "X-CB-Service-Name";

/// Per-call option key carrying the logical service name.
/// Takes priority over [`SERVICE_NAME_HEADER`].
pub const REQUESTED_SERVICE_NAME_OPTION: &str = "circuit_breaker.requested_service_name";

/// Per-call options travelling with a request.
///
/// Stored as an [`http::Request`] extension so every layer of a tower stack
/// sees the same options without touching the wire request. A request without
/// the extension behaves as if it carried empty options.
///
/// # Example
///
/// ```ignore
/// let req = http::Request::get("https://billing.internal/invoices")
///     .extension(RequestOptions::for_service("billing"))
///     .body(Full::new(Bytes::new()))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestOptions(HashMap<String, Value>);

impl RequestOptions {
    /// Create an empty options mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the requested service name already set
    #[must_use]
    pub fn for_service(name: impl Into<String>) -> Self {
        Self::new().with(REQUESTED_SERVICE_NAME_OPTION, name.into())
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert an option, returning the previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove an option, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, `None` if missing or not a JSON string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for RequestOptions {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}
