//! Loading documents from text or already-parsed JSON values

use crate::error::{SpecError, SpecResult};
use crate::types::Document;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static LARGE_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*(?:minimum|maximum|exclusiveMinimum|exclusiveMaximum):\s*)(-?\d{16,})")
        .expect("bound pattern is valid")
});

/// Builds [`Document`]s. Performs no I/O; callers hand in text or values.
pub struct SpecParser;

impl SpecParser {
    /// Parse a document from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> SpecResult<Document> {
        if content.trim_start().starts_with('{') {
            Self::parse_json(content)
        } else {
            Self::parse_yaml(content)
        }
    }

    /// Parse a document from JSON text
    pub fn parse_json(content: &str) -> SpecResult<Document> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Parse a document from YAML text
    pub fn parse_yaml(content: &str) -> SpecResult<Document> {
        let content = Self::sanitize_large_numbers(content);
        let value: Value = serde_yaml::from_str(&content)?;
        Self::from_value(value)
    }

    /// Read a document out of an untyped JSON value
    pub fn from_value(value: Value) -> SpecResult<Document> {
        if !value.is_object() {
            return Err(SpecError::InvalidFormat(format!(
                "expected an object at the top level, found {}",
                kind_of(&value)
            )));
        }

        let document: Document = serde_json::from_value(value)?;

        debug!(
            "Loaded document {:?} ({} paths, {} operations)",
            document.title().unwrap_or("untitled"),
            document.paths().count(),
            document.operations().count()
        );

        Ok(document)
    }

    /// Clamp schema bounds too large for a JSON number.
    ///
    /// Some published specs use 64-bit sentinels for `minimum`/`maximum`,
    /// which YAML hands over as numbers JSON values cannot hold.
    fn sanitize_large_numbers(content: &str) -> String {
        LARGE_BOUND
            .replace_all(content, |caps: &regex::Captures| {
                let prefix = &caps[1];
                if caps[2].starts_with('-') {
                    format!("{}-2147483648", prefix)
                } else {
                    format!("{}2147483647", prefix)
                }
            })
            .into_owned()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
