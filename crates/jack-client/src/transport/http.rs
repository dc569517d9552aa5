//! HTTP transport backed by reqwest

use async_trait::async_trait;
use jack_spec::{Document, HttpMethod};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use super::{Arguments, RequestOptions, Transport};
use crate::error::TransportError;
use crate::settings::ClientSettings;

/// Sends bound operation calls to `base_url` + path.
///
/// Successful responses are returned as JSON: the parsed body, the raw text
/// as a string when it is not JSON, or `null` when it is empty.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    settings: ClientSettings,
}

impl HttpTransport {
    /// Create a transport for `settings`; `base_url` must be set
    pub fn new(settings: ClientSettings) -> Result<Self, TransportError> {
        let base_url = settings.base_url.clone().ok_or(TransportError::MissingBaseUrl)?;
        Self::with_base_url(base_url, settings)
    }

    /// Create a transport, falling back to the document's first server URL
    pub fn for_document(document: &Document, settings: ClientSettings) -> Result<Self, TransportError> {
        let base_url = settings
            .base_url
            .clone()
            .or_else(|| document.server_url().map(str::to_string))
            .ok_or(TransportError::MissingBaseUrl)?;
        Self::with_base_url(base_url, settings)
    }

    fn with_base_url(base_url: String, settings: ClientSettings) -> Result<Self, TransportError> {
        Url::parse(&base_url).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = Client::builder();
        if settings.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}{}", self.base_url, path);
        Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", joined, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    type Response = Value;
    type Error = TransportError;

    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, TransportError> {
        let url = self.url_for(path)?;
        let method = to_reqwest(options.method);

        let mut request = self.client.request(method.clone(), url.clone());

        for (name, value) in self.settings.default_headers.iter().chain(options.headers.iter()) {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(params) = &options.params {
            let pairs = query_pairs(params);
            if !pairs.is_empty() {
                request = request.query(&pairs);
            }
        }

        if let Some(data) = &options.data {
            debug!(
                "Request body: {}",
                serde_json::to_string(data).unwrap_or_default()
            );
            request = request.json(data);
        }

        info!(
            "Executing {} {} with body: {:?}",
            method,
            url,
            options.data.as_ref().map(|b| b.keys().collect::<Vec<_>>())
        );

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        debug!("Response status: {}", status);

        if status.is_success() {
            Ok(parse_body(response_text))
        } else {
            error!("Request failed with status {}: {}", status, response_text);
            Err(TransportError::Status {
                status: status.as_u16(),
                body: response_text,
            })
        }
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}

/// Flatten a query bag into pairs: arrays repeat the key, objects are sent
/// as JSON text, `null` is dropped.
fn query_pairs(params: &Arguments) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push((key.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }

    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }

    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
