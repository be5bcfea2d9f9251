#![deny(clippy::all)]

/**
 * cssesm - runtime CSS Modules scoping
 *
 * Rewrites local class selectors to seeded, globally unique names, injects the
 * result into a page stylesheet and hands back a class-name mapping.
 */

// Scoping core
pub mod class_name;
pub mod hash;
pub mod rule_visitor;
pub mod selector_scope;

// Parsing and serialization
pub mod css_parser;

// Stylesheet lifecycle
pub mod registry;
pub mod sheet;
pub mod stylesheet;

// Collaborators and ambient concerns
pub mod config;
mod error;
pub mod fetch;
pub mod logging;
pub mod style_url_resolver;

// Re-exports
pub use class_name::{fold_case, ClassNameMapper};
pub use config::CssModulesConfig;
pub use error::{CssModulesError, CssParseError, FetchError, ParseErrorKind, Result};
pub use registry::StylesheetRegistry;
pub use selector_scope::rewrite_selector;
pub use stylesheet::{Export, ExportProxy, LoadedSignal, SourceKey, StylesheetState};

/// Scope a selector with the class-name mapping of the stylesheet keyed by `key`.
pub fn scope_selector(key: &str, selector: &str) -> String {
    let mapper = ClassNameMapper::for_key(key);
    rewrite_selector(selector, &mut |name: &str| mapper.map(name))
}
