#![deny(clippy::all)]

/**
 * cssesm CLI
 *
 * Scopes a stylesheet from stdin, a file or a URL and prints the scoped CSS
 * or its class-name mapping.
 */
pub mod failure_watch;
pub mod scope;

pub use scope::{render, scope, OutputFormat, ScopeOptions, Source};

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
