//! Binding a document's operations into a client

use indexmap::IndexMap;
use jack_spec::{to_camel_case, Document, Parameter, SpecParser, SpecResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::InvokeError;
use crate::invoker::BoundOperation;
use crate::settings::ArgumentPlacement;
use crate::transport::{Arguments, Transport};

/// A client bound from an OpenAPI document.
///
/// Holds one [`BoundOperation`] per distinct camelCased `operationId`, in
/// document order, plus the document's `info` block. Nothing changes after
/// binding, so calls may run concurrently.
pub struct Client<T> {
    info: Value,
    operations: IndexMap<String, BoundOperation<T>>,
    transport: Arc<T>,
}

impl<T> Client<T> {
    /// Bind every operation of `document` that has an `operationId`
    pub fn bind(document: &Document, transport: T) -> Self {
        Self::bind_with(document, Arc::new(transport), ArgumentPlacement::default())
    }

    /// Bind with a shared transport and an explicit placement policy.
    ///
    /// Operations are visited path by path, method by method, in document
    /// order. Ids that normalize to the same key replace the earlier binding.
    pub fn bind_with(document: &Document, transport: Arc<T>, placement: ArgumentPlacement) -> Self {
        let mut operations: IndexMap<String, BoundOperation<T>> = IndexMap::new();

        for (template, method, item, operation) in document.operations() {
            let Some(operation_id) = operation.operation_id.as_deref().filter(|id| !id.is_empty())
            else {
                debug!("Skipping {} {}: no operationId", method, template);
                continue;
            };

            let name = to_camel_case(operation_id);
            let parameters = merge_parameters(&item.parameters, &operation.parameters);

            let bound = BoundOperation::new(
                name.clone(),
                operation_id.to_string(),
                method,
                template.to_string(),
                parameters,
                placement,
                Arc::clone(&transport),
            );

            if let Some(previous) = operations.insert(name.clone(), bound) {
                debug!(
                    "{} now bound to {} {} (replaces {} {})",
                    name,
                    method,
                    template,
                    previous.method(),
                    previous.path_template()
                );
            } else {
                debug!("Bound {} -> {} {}", name, method, template);
            }
        }

        debug!("Bound {} operations", operations.len());

        Self {
            info: document.info.clone(),
            operations,
            transport,
        }
    }

    /// Load an untyped document and bind it
    pub fn from_value(document: Value, transport: T) -> SpecResult<Self> {
        let document = SpecParser::from_value(document)?;
        Ok(Self::bind(&document, transport))
    }

    /// The document's `info` block, verbatim
    pub fn info(&self) -> &Value {
        &self.info
    }

    /// Look up a bound operation by key
    pub fn operation(&self, name: &str) -> Option<&BoundOperation<T>> {
        self.operations.get(name)
    }

    /// Bound operations in binding order
    pub fn operations(&self) -> impl Iterator<Item = &BoundOperation<T>> {
        self.operations.values()
    }

    /// Bound keys in binding order
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The transport every operation dispatches through
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}

impl<T: Transport> Client<T> {
    /// Invoke the operation bound under `name`
    pub async fn call(
        &self,
        name: &str,
        args: Arguments,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        let operation = self
            .operation(name)
            .ok_or_else(|| InvokeError::UnknownOperation(name.to_string()))?;

        operation.invoke(args).await
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("info", &self.info)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Path-level parameters first, then the operation's own; an operation
/// parameter with the same name and location replaces the path-level one.
/// Bare `$ref` parameters are dropped.
fn merge_parameters(path_level: &[Parameter], own: &[Parameter]) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = path_level
        .iter()
        .filter(|p| !p.is_reference_only())
        .filter(|p| {
            !own.iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();

    merged.extend(own.iter().filter(|p| !p.is_reference_only()).cloned());
    merged
}
