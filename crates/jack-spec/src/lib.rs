//! # jack-spec
//!
//! OpenAPI document model for jack.
//! Holds the paths, operations and parameters a client is bound from, and the
//! naming rule that turns an `operationId` into a client key.

mod types;
mod parser;
mod naming;
mod error;

pub use types::*;
pub use parser::SpecParser;
pub use naming::to_camel_case;
pub use error::{SpecError, SpecResult};
