//! Client settings
//!
//! Stored as a plain camelCase JSON file. Every field has a default, so a
//! missing file or a partial one is fine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

/// Where call arguments end up in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentPlacement {
    /// All arguments go to the query bag for GET and to the body otherwise,
    /// whatever their declared location.
    #[default]
    Verbatim,
    /// Arguments are split by declared location: path parameters are left
    /// out, query parameters go to the query bag, header and cookie
    /// parameters become headers. Undeclared arguments are placed as in
    /// `Verbatim`.
    ByLocation,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL prepended to every path; falls back to the document's first server
    pub base_url: Option<String>,
    /// Request timeout in seconds (0 = none)
    pub timeout_secs: u64,
    /// Headers sent with every request
    pub default_headers: IndexMap<String, String>,
    /// Argument placement policy
    pub placement: ArgumentPlacement,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            default_headers: IndexMap::new(),
            placement: ArgumentPlacement::Verbatim,
        }
    }
}

impl ClientSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file, using defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the placement policy
    pub fn with_placement(mut self, placement: ArgumentPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}
