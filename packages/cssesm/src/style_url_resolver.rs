//! Style URL Resolver
//!
//! Turns a stylesheet path into the absolute URL used as its cache key, so
//! relative and absolute references to the same resource collide.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{CssModulesError, Result};

/// Regex to match URL schema
static URL_WITH_SCHEMA_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*):").unwrap());

/// Check whether a stylesheet path already carries a schema (`https:`, `file:`).
pub fn has_schema(path: &str) -> bool {
    URL_WITH_SCHEMA_REGEXP.is_match(path)
}

/// Resolve `path` against `base_url`. An empty path resolves to the base itself.
pub fn resolve_style_url(base_url: &str, path: &str) -> Result<String> {
    let base = Url::parse(base_url).map_err(|e| CssModulesError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    let resolved = base.join(path).map_err(|e| CssModulesError::InvalidUrl {
        url: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(resolved.into())
}
