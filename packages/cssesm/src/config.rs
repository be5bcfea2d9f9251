//! Registry configuration

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{CssModulesError, Result};

pub const DEFAULT_BASE_URL: &str = "file:///";
pub const DEFAULT_LOADED_KEY: &str = "$loaded";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CssModulesConfig {
    /// Base URL relative stylesheet paths are resolved against; `file:///` when unset
    pub base_url: Option<String>,
    /// Reserved export key that yields the loaded signal
    pub loaded_key: String,
    /// Warn when a class is looked up that the loaded CSS never produced
    pub warn_on_missing_export: bool,
}

impl Default for CssModulesConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            loaded_key: DEFAULT_LOADED_KEY.to_string(),
            warn_on_missing_export: true,
        }
    }
}

impl CssModulesConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CssModulesError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CssModulesError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_missing_fields_with_defaults() {
        let config = CssModulesConfig::from_json(r#"{"baseUrl": "https://example.com/app/"}"#)
            .unwrap();
        assert_eq!(config.base_url(), "https://example.com/app/");
        assert_eq!(config.loaded_key, DEFAULT_LOADED_KEY);
        assert!(config.warn_on_missing_export);
    }

    #[test]
    fn should_leave_base_url_unset_when_absent() {
        let config = CssModulesConfig::from_json(r#"{"loadedKey": "ready"}"#).unwrap();
        assert_eq!(config.base_url, None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.loaded_key, "ready");
    }

    #[test]
    fn should_reject_malformed_json() {
        assert!(matches!(
            CssModulesConfig::from_json("{"),
            Err(CssModulesError::Config(_))
        ));
    }
}
