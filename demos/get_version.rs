//! Bind a small document and call `getVersion` against a live server.
//!
//! Usage: cargo run --example get_version -- http://localhost:8000

use jack_client::{Client, ClientSettings, HttpTransport};
use jack_spec::SpecParser;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let document = SpecParser::from_value(json!({
        "openapi": "3.0.0",
        "info": { "title": "jack demo", "version": "1.0.0" },
        "paths": {
            "/api/v1/version": {
                "get": { "operationId": "get-version", "tags": ["meta"] }
            },
            "/api/v1/test/{rsid}": {
                "get": {
                    "operationId": "get-test",
                    "parameters": [{ "name": "rsid", "in": "path", "required": true }]
                }
            }
        }
    }))?;

    let transport = HttpTransport::new(ClientSettings::new().with_base_url(base_url))?;
    let client = Client::bind(&document, transport);

    println!("[jack] {:?}", client);

    let version = client.call("getVersion", Default::default()).await?;
    println!("[res] {}", version);

    match client.call("getTest", Default::default()).await {
        Ok(res) => println!("[res] {}", res),
        Err(e) => println!("[getTest] {}", e),
    }

    Ok(())
}
