//! # jack-client
//!
//! Runtime OpenAPI client for jack.
//! Binds every operation of a document that has an `operationId` to a
//! callable keyed by the camelCased id, and dispatches calls through a
//! [`Transport`].

mod binder;
mod error;
mod invoker;
mod settings;
pub mod transport;

pub use binder::Client;
pub use error::{ConfigError, InvokeError, MissingParameterError, TransportError};
pub use invoker::BoundOperation;
pub use settings::{ArgumentPlacement, ClientSettings};
pub use transport::{Arguments, HttpTransport, RequestOptions, Transport};
