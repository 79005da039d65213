//! Names used for persistence, the document attribute and the OS query.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Default key for the persisted preference and the document attribute.
pub const DEFAULT_THEME_KEY: &str = "data-expo-theme";

/// Default media query for the OS "prefers dark" signal.
pub const DEFAULT_MEDIA_QUERY: &str = "(prefers-color-scheme: dark)";

/// Provider configuration.
///
/// Every field has a default, so partial YAML documents are accepted:
///
/// ```rust
/// use expo_theme::ThemeConfig;
///
/// let config = ThemeConfig::from_yaml_str("attribute: data-theme\n").unwrap();
/// assert_eq!(config.attribute, "data-theme");
/// assert_eq!(config.storage_key, "data-expo-theme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Key holding the explicit preference in persisted storage.
    pub storage_key: String,
    /// Attribute set on the document root.
    pub attribute: String,
    /// Media query for the OS dark-preference signal. Only the browser
    /// backend evaluates it; native hosts ask the OS directly.
    pub media_query: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_THEME_KEY.to_string(),
            attribute: DEFAULT_THEME_KEY.to_string(),
            media_query: DEFAULT_MEDIA_QUERY.to_string(),
        }
    }
}

impl ThemeConfig {
    /// Parses a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ThemeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_yaml_str(&source).map_err(|e| ThemeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::debug!("Loaded theme config from {:?}", path);
        Ok(config)
    }
}
