//! # jack-cli
//!
//! Helpers behind the `jack` binary: loading a document from disk, listing
//! its bound operations, reading call arguments.

use anyhow::{bail, Context, Result};
use jack_client::{Arguments, Client};
use jack_spec::{Document, SpecParser};
use serde_json::Value;
use std::path::Path;

/// Read and parse a JSON or YAML document
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    SpecParser::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse `--args` JSON into call arguments; no input means no arguments
pub fn parse_arguments(raw: Option<&str>) -> Result<Arguments> {
    let Some(raw) = raw else {
        return Ok(Arguments::new());
    };

    match serde_json::from_str::<Value>(raw).context("Arguments must be valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("Arguments must be a JSON object, got {}", other),
    }
}

/// One `name METHOD /template` line per bound operation, in binding order
pub fn operation_lines<T>(client: &Client<T>) -> Vec<String> {
    let width = client.operation_names().map(str::len).max().unwrap_or(0);

    client
        .operations()
        .map(|op| {
            format!(
                "{:width$}  {:7} {}",
                op.name(),
                op.method().as_str(),
                op.path_template(),
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jack_client::{ClientSettings, HttpTransport};
    use tempfile::TempDir;

    const SPEC: &str = r#"
openapi: "3.0.0"
info:
  title: Jack
  version: "1.0.0"
paths:
  /version:
    get:
      operationId: get-version
  /items/{id}:
    delete:
      operationId: delete_item
      parameters:
        - name: id
          in: path
"#;

    #[test]
    fn test_load_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api.yaml");
        std::fs::write(&path, SPEC).unwrap();

        let document = load_document(&path).unwrap();
        let transport = HttpTransport::new(ClientSettings::new().with_base_url("http://localhost")).unwrap();
        let client = Client::bind(&document, transport);

        let lines = operation_lines(&client);
        assert_eq!(
            lines,
            vec![
                "getVersion  GET     /version".to_string(),
                "deleteItem  DELETE  /items/{id}".to_string(),
            ]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_document(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_parse_arguments() {
        assert!(parse_arguments(None).unwrap().is_empty());

        let args = parse_arguments(Some(r#"{"rsid":"abc","count":0}"#)).unwrap();
        assert_eq!(args.len(), 2);

        assert!(parse_arguments(Some("[1]")).is_err());
        assert!(parse_arguments(Some("{oops")).is_err());
    }
}
