//! Transports performing the HTTP call of a bound operation

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use indexmap::IndexMap;
use jack_spec::HttpMethod;
use serde_json::{Map, Value};

/// Call arguments keyed by parameter name
pub type Arguments = Map<String, Value>;

/// What a bound operation hands to the transport besides the path
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// HTTP method
    pub method: HttpMethod,
    /// Query-parameter bag
    pub params: Option<Arguments>,
    /// Request body payload
    pub data: Option<Arguments>,
    /// Extra request headers
    pub headers: IndexMap<String, String>,
}

impl RequestOptions {
    /// Options with no payload
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            params: None,
            data: None,
            headers: IndexMap::new(),
        }
    }

    /// Send `args` as query parameters
    pub fn with_params(mut self, args: Arguments) -> Self {
        self.params = Some(args);
        self
    }

    /// Send `args` as the request body
    pub fn with_data(mut self, args: Arguments) -> Self {
        self.data = Some(args);
        self
    }
}

/// Performs the network call of a bound operation.
///
/// Responses and errors are returned to the caller of the operation as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Response handed back to the caller
    type Response: Send;
    /// Failure handed back to the caller
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform one request for `path` (template already substituted)
    async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Self::Response, Self::Error>;
}
