//! Runner configuration.

use crate::errors::{SpecError, SpecResult};
use crate::registry::COMMAND_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a [`SpecRunner`](crate::SpecRunner).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// namespace = "urn:example:spec"
/// embed_stylesheet = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Namespace URI of the command attributes.
    pub namespace: String,
    /// Extension of documents derived from fixture type names.
    pub extension: String,
    /// Append the result stylesheet to rendered documents.
    pub embed_stylesheet: bool,
    /// Process linked documents after their parent.
    pub follow_links: bool,
}

impl RunnerConfig {
    pub fn standard() -> Self {
        Self {
            namespace: COMMAND_NAMESPACE.to_string(),
            extension: "html".to_string(),
            embed_stylesheet: true,
            follow_links: true,
        }
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::standard());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SpecError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(content: &str) -> SpecResult<Self> {
        toml::from_str(content).map_err(|e| SpecError::Config {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::standard()
    }
}
