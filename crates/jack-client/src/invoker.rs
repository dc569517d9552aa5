//! Bound operations: validate, substitute, dispatch

use indexmap::IndexMap;
use jack_spec::{HttpMethod, Parameter, ParameterLocation};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::{InvokeError, MissingParameterError};
use crate::settings::ArgumentPlacement;
use crate::transport::{Arguments, RequestOptions, Transport};

/// One operation of a document, callable through its transport.
///
/// Everything it holds is fixed when the client is bound.
pub struct BoundOperation<T> {
    name: String,
    operation_id: String,
    method: HttpMethod,
    path_template: String,
    parameters: Vec<Parameter>,
    placement: ArgumentPlacement,
    transport: Arc<T>,
}

impl<T> BoundOperation<T> {
    pub(crate) fn new(
        name: String,
        operation_id: String,
        method: HttpMethod,
        path_template: String,
        parameters: Vec<Parameter>,
        placement: ArgumentPlacement,
        transport: Arc<T>,
    ) -> Self {
        Self {
            name,
            operation_id,
            method,
            path_template,
            parameters,
            placement,
            transport,
        }
    }

    /// Key the operation is bound under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `operationId` as written in the document
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// Parameters in declaration order, path-level ones first
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Check that every required parameter has a key in `args`.
    ///
    /// Presence is all that counts: `0`, `false`, `""` and `null` are values.
    /// Reports the first missing parameter in declaration order.
    pub fn validate(&self, args: &Arguments) -> Result<(), MissingParameterError> {
        match self
            .parameters
            .iter()
            .find(|p| p.is_required() && !args.contains_key(&p.name))
        {
            Some(param) => Err(MissingParameterError {
                name: param.name.clone(),
                description: param.description.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Fill the `{name}` placeholders of path parameters from `args`.
    ///
    /// Values are inserted as-is; percent-encoding is left to the transport.
    pub fn substitute_path(&self, args: &Arguments) -> String {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
            .fold(self.path_template.clone(), |path, param| {
                match args.get(&param.name) {
                    Some(value) => {
                        path.replacen(&format!("{{{}}}", param.name), &value_text(value), 1)
                    }
                    None => path,
                }
            })
    }

    /// Place `args` into request options according to the placement policy
    pub fn request_options(&self, args: Arguments) -> RequestOptions {
        match self.placement {
            ArgumentPlacement::Verbatim => place(RequestOptions::new(self.method), args),
            ArgumentPlacement::ByLocation => self.place_by_location(args),
        }
    }

    fn place_by_location(&self, args: Arguments) -> RequestOptions {
        let mut query = Arguments::new();
        let mut rest = Arguments::new();
        let mut headers = IndexMap::new();
        let mut cookies = Vec::new();

        for (key, value) in args {
            match self.location_of(&key) {
                Some(ParameterLocation::Path) => {}
                Some(ParameterLocation::Query) => {
                    query.insert(key, value);
                }
                Some(ParameterLocation::Header) if !value.is_null() => {
                    headers.insert(key, value_text(&value));
                }
                Some(ParameterLocation::Cookie) if !value.is_null() => {
                    cookies.push(format!("{}={}", key, value_text(&value)));
                }
                Some(ParameterLocation::Header | ParameterLocation::Cookie) => {}
                _ => {
                    rest.insert(key, value);
                }
            }
        }

        if !cookies.is_empty() {
            headers.insert("Cookie".to_string(), cookies.join("; "));
        }

        let mut options = RequestOptions::new(self.method);
        options.headers = headers;

        if self.method == HttpMethod::Get {
            query.extend(rest);
            options.with_params(query)
        } else {
            if !query.is_empty() {
                options.params = Some(query);
            }
            options.with_data(rest)
        }
    }

    /// Declared location of argument `name`.
    ///
    /// A name declared both in the path and elsewhere counts as a path
    /// parameter, since its value is already in the URL. Otherwise the first
    /// declaration wins.
    fn location_of(&self, name: &str) -> Option<ParameterLocation> {
        let mut declared = self.parameters.iter().filter(|p| p.name == name);
        let first = declared.next()?.location;

        if first != ParameterLocation::Path
            && declared.any(|p| p.location == ParameterLocation::Path)
        {
            return Some(ParameterLocation::Path);
        }
        Some(first)
    }
}

impl<T: Transport> BoundOperation<T> {
    /// Call the operation: validate, substitute the path, dispatch once.
    pub async fn invoke(&self, args: Arguments) -> Result<T::Response, InvokeError<T::Error>> {
        self.validate(&args)?;

        let path = self.substitute_path(&args);
        let options = self.request_options(args);

        debug!("[request] {} {} ({})", self.method, path, self.name);

        self.transport
            .request(&path, options)
            .await
            .map_err(InvokeError::Transport)
    }
}

impl<T> Clone for BoundOperation<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            operation_id: self.operation_id.clone(),
            method: self.method,
            path_template: self.path_template.clone(),
            parameters: self.parameters.clone(),
            placement: self.placement,
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> std::fmt::Debug for BoundOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundOperation")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path_template", &self.path_template)
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

/// GET carries the arguments as query parameters, every other verb as body
fn place(options: RequestOptions, args: Arguments) -> RequestOptions {
    if options.method == HttpMethod::Get {
        options.with_params(args)
    } else {
        options.with_data(args)
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::RecordingTransport;
    use serde_json::json;

    fn params(value: Value) -> Vec<Parameter> {
        serde_json::from_value(value).unwrap()
    }

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn bound(
        method: HttpMethod,
        template: &str,
        parameters: Vec<Parameter>,
        placement: ArgumentPlacement,
    ) -> (BoundOperation<RecordingTransport>, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let op = BoundOperation::new(
            "op".to_string(),
            "op".to_string(),
            method,
            template.to_string(),
            parameters,
            placement,
            Arc::clone(&transport),
        );
        (op, transport)
    }

    #[tokio::test]
    async fn test_substitutes_numeric_path_parameter() {
        let (op, transport) = bound(
            HttpMethod::Get,
            "/items/{id}",
            params(json!([{ "name": "id", "in": "path", "required": true }])),
            ArgumentPlacement::Verbatim,
        );

        op.invoke(args(json!({ "id": 42 }))).await.unwrap();

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, "/items/42");
    }

    #[tokio::test]
    async fn test_missing_required_parameter_skips_transport() {
        let (op, transport) = bound(
            HttpMethod::Post,
            "/counter",
            params(json!([{ "name": "count", "in": "query", "required": true,
                            "description": "How many" }])),
            ArgumentPlacement::Verbatim,
        );

        let err = op.invoke(Arguments::new()).await.unwrap_err();
        let missing = err.missing_parameter().unwrap();
        assert_eq!(missing.name, "count");
        assert!(err.to_string().contains("count"));
        assert!(err.to_string().contains("How many"));
        assert!(transport.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_falsy_values_are_present() {
        let (op, transport) = bound(
            HttpMethod::Post,
            "/counter",
            params(json!([
                { "name": "count", "in": "query", "required": true },
                { "name": "flag", "in": "query", "required": true },
                { "name": "label", "in": "query", "required": true },
                { "name": "nothing", "in": "query", "required": true }
            ])),
            ArgumentPlacement::Verbatim,
        );

        op.invoke(args(json!({ "count": 0, "flag": false, "label": "", "nothing": null })))
            .await
            .unwrap();

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        let data = recorded[0].options.data.as_ref().unwrap();
        assert_eq!(data.get("count"), Some(&json!(0)));
    }

    #[test]
    fn test_validate_reports_first_missing_in_declaration_order() {
        let (op, _) = bound(
            HttpMethod::Get,
            "/a/{b}",
            params(json!([
                { "name": "first", "in": "query", "required": true },
                { "name": "b", "in": "path" },
                { "name": "optional", "in": "query" }
            ])),
            ArgumentPlacement::Verbatim,
        );

        assert_eq!(op.validate(&Arguments::new()).unwrap_err().name, "first");
        assert_eq!(
            op.validate(&args(json!({ "first": 1 }))).unwrap_err().name,
            "b"
        );
        assert!(op.validate(&args(json!({ "first": 1, "b": "x" }))).is_ok());
    }

    #[test]
    fn test_substitute_path_leaves_template_untouched() {
        let (op, _) = bound(
            HttpMethod::Get,
            "/users/{userId}/posts/{postId}",
            params(json!([
                { "name": "userId", "in": "path" },
                { "name": "postId", "in": "path" },
                { "name": "userId2", "in": "query" }
            ])),
            ArgumentPlacement::Verbatim,
        );

        let path = op.substitute_path(&args(json!({ "userId": "u 1", "postId": true })));
        assert_eq!(path, "/users/u 1/posts/true");
        assert_eq!(op.path_template(), "/users/{userId}/posts/{postId}");

        let path = op.substitute_path(&args(json!({ "userId": "u1" })));
        assert_eq!(path, "/users/u1/posts/{postId}");
    }

    #[test]
    fn test_substitution_only_for_path_parameters() {
        let (op, _) = bound(
            HttpMethod::Get,
            "/search/{q}",
            params(json!([{ "name": "q", "in": "query" }])),
            ArgumentPlacement::Verbatim,
        );

        assert_eq!(op.substitute_path(&args(json!({ "q": "x" }))), "/search/{q}");
    }

    #[test]
    fn test_verbatim_placement_by_method() {
        let declared = params(json!([
            { "name": "id", "in": "path" },
            { "name": "X-Request-Id", "in": "header" }
        ]));
        let call = args(json!({ "id": 1, "X-Request-Id": "abc", "name": "n" }));

        let (get, _) = bound(HttpMethod::Get, "/r/{id}", declared.clone(), ArgumentPlacement::Verbatim);
        let options = get.request_options(call.clone());
        assert_eq!(options.params.as_ref(), Some(&call));
        assert!(options.data.is_none());
        assert!(options.headers.is_empty());

        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
            let (op, _) = bound(method, "/r/{id}", declared.clone(), ArgumentPlacement::Verbatim);
            let options = op.request_options(call.clone());
            assert_eq!(options.method, method);
            assert!(options.params.is_none());
            assert_eq!(options.data.as_ref(), Some(&call));
        }
    }

    #[test]
    fn test_by_location_placement() {
        let declared = params(json!([
            { "name": "id", "in": "path" },
            { "name": "verbose", "in": "query" },
            { "name": "X-Request-Id", "in": "header" },
            { "name": "session", "in": "cookie" },
            { "name": "theme", "in": "cookie" }
        ]));
        let call = args(json!({
            "id": 7,
            "verbose": true,
            "X-Request-Id": "abc",
            "session": "s1",
            "theme": "dark",
            "name": "widget"
        }));

        let (post, _) = bound(HttpMethod::Post, "/r/{id}", declared.clone(), ArgumentPlacement::ByLocation);
        let options = post.request_options(call.clone());
        assert_eq!(options.params, Some(args(json!({ "verbose": true }))));
        assert_eq!(options.data, Some(args(json!({ "name": "widget" }))));
        assert_eq!(options.headers.get("X-Request-Id").map(String::as_str), Some("abc"));
        assert_eq!(
            options.headers.get("Cookie").map(String::as_str),
            Some("session=s1; theme=dark")
        );

        let (get, _) = bound(HttpMethod::Get, "/r/{id}", declared, ArgumentPlacement::ByLocation);
        let options = get.request_options(call);
        assert_eq!(options.params, Some(args(json!({ "verbose": true, "name": "widget" }))));
        assert!(options.data.is_none());
    }

    #[test]
    fn test_by_location_path_wins_for_shared_names() {
        let declared = params(json!([
            { "name": "id", "in": "query" },
            { "name": "id", "in": "path" },
            { "name": "tag", "in": "header" },
            { "name": "tag", "in": "query" }
        ]));
        let call = args(json!({ "id": 5, "tag": "t" }));

        let (get, _) = bound(HttpMethod::Get, "/r/{id}", declared, ArgumentPlacement::ByLocation);
        assert_eq!(get.substitute_path(&call), "/r/5");

        let options = get.request_options(call);
        assert_eq!(options.params, Some(Arguments::new()));
        assert_eq!(options.headers.get("tag").map(String::as_str), Some("t"));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let transport = Arc::new(RecordingTransport::refusing());
        let op = BoundOperation::new(
            "ping".to_string(),
            "ping".to_string(),
            HttpMethod::Get,
            "/ping".to_string(),
            Vec::new(),
            ArgumentPlacement::Verbatim,
            Arc::clone(&transport),
        );

        let err = op.invoke(Arguments::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "transport refused: /ping");
        assert!(err.into_transport().is_some());
        assert_eq!(transport.recorded().len(), 1);
    }
}
