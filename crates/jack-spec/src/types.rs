//! Type definitions for OpenAPI documents

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// HTTP methods an OpenAPI path item may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Parse a path item key (`get`, `post`, ...). Case-sensitive, as in OpenAPI.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter location in HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// Any other `in` value, or none at all (e.g. a `$ref` parameter)
    #[default]
    #[serde(other)]
    Unknown,
}

/// A parameter descriptor of an operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (empty when only `$ref` is given)
    #[serde(default)]
    pub name: String,
    /// Where the parameter is located
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    /// Whether the document marks the parameter as required
    #[serde(default, deserialize_with = "lenient")]
    pub required: bool,
    /// Parameter description
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the parameter, never interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Reference to a parameter in components/parameters, never resolved
    #[serde(rename = "$ref", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Parameter {
    /// Path parameters are required whatever the document says.
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParameterLocation::Path
    }

    /// A bare `$ref` with nothing to bind against
    pub fn is_reference_only(&self) -> bool {
        self.reference.is_some() && self.name.is_empty()
    }
}

/// A single operation under a path template.
///
/// Metadata of the wrong shape (`"summary": 1`, `"parameters": null`, ...)
/// loads as empty instead of failing the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation ID; operations without one are never bound
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Vec<String>,
    /// Parameters in declaration order
    #[serde(default, deserialize_with = "lenient_parameters")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub responses: IndexMap<String, Value>,
}

/// The operations declared under one path template.
///
/// Keys that are not HTTP methods (`summary`, `servers`, extensions, ...) are
/// dropped while loading, and so are operations that are not objects.
/// Method order follows the document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PathItem {
    /// Operations keyed by method, in document order
    #[serde(flatten)]
    pub operations: IndexMap<HttpMethod, Operation>,
    /// Parameters shared by every operation of this path
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut item = PathItem::default();

        let Value::Object(raw) = Value::deserialize(deserializer)? else {
            debug!("Path item is not an object, treating it as empty");
            return Ok(item);
        };

        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = parameters_from(value);
            } else if let Some(method) = HttpMethod::from_key(&key) {
                match serde_json::from_value(value) {
                    Ok(operation) => {
                        item.operations.insert(method, operation);
                    }
                    Err(e) => debug!("Skipping malformed {} operation: {}", key, e),
                }
            }
        }

        Ok(item)
    }
}

/// Read a field, falling back to its default when it is null or mistyped
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_parameters<'de, D>(deserializer: D) -> Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(parameters_from)
}

/// Parameters out of a list, dropping entries that are not parameters
fn parameters_from(value: Value) -> Vec<Parameter> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(param) => Some(param),
            Err(e) => {
                debug!("Skipping malformed parameter: {}", e);
                None
            }
        })
        .collect()
}

/// Server information from the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,
    /// Server description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An OpenAPI (or Swagger) document, as far as binding needs it.
///
/// `components` and everything else not listed here is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
    /// Opaque metadata, kept verbatim
    #[serde(default)]
    pub info: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub servers: Vec<Server>,
    /// Path templates in document order; `None` when the document has no `paths`
    #[serde(default, deserialize_with = "lenient")]
    pub paths: Option<IndexMap<String, PathItem>>,
}

impl Document {
    /// Iterate `(template, item)` pairs in document order
    pub fn paths(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.paths
            .iter()
            .flat_map(|paths| paths.iter().map(|(template, item)| (template.as_str(), item)))
    }

    /// Iterate every `(template, method, path item, operation)` in document order
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &PathItem, &Operation)> {
        self.paths().flat_map(|(template, item)| {
            item.operations
                .iter()
                .map(move |(method, operation)| (template, *method, item, operation))
        })
    }

    /// `info.title`, when present
    pub fn title(&self) -> Option<&str> {
        self.info.get("title").and_then(Value::as_str)
    }

    /// `info.version`, when present
    pub fn version(&self) -> Option<&str> {
        self.info.get("version").and_then(Value::as_str)
    }

    /// URL of the first declared server
    pub fn server_url(&self) -> Option<&str> {
        self.servers.first().map(|s| s.url.as_str())
    }
}
