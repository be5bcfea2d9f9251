//! Scope Command
//!
//! Runs one stylesheet through a fresh registry and renders the result.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use cssesm::fetch::DefaultFetcher;
use cssesm::logging::{NullLogger, TracingLogger};
use cssesm::sheet::MemoryInjector;
use cssesm::style_url_resolver::has_schema;
use cssesm::{CssModulesConfig, ExportProxy, StylesheetRegistry};
use url::Url;

use crate::failure_watch::FailureWatch;

/// Where the stylesheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// CSS text given directly, e.g. read from stdin.
    Inline(String),
    /// A file path or URL, resolved against the base URL.
    Path(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Css,
    Exports,
    Json,
}

#[derive(Debug, Clone)]
pub struct ScopeOptions {
    pub source: Source,
    pub base_url: Option<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    /// Drop warnings and diagnostics; failures are still reported.
    pub quiet: bool,
}

/// Scopes the source and returns the rendered output.
///
/// Must run inside a [`tokio::task::LocalSet`] since path sources are
/// fetched with `spawn_local`.
pub async fn scope(options: &ScopeOptions) -> Result<String> {
    let mut config = match &options.config {
        Some(path) => CssModulesConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CssModulesConfig::default(),
    };

    if let Some(base_url) = &options.base_url {
        config.base_url = Some(base_url.clone());
    } else if config.base_url.is_none() {
        if let Source::Path(path) = &options.source {
            if !has_schema(path) {
                config.base_url = Some(cwd_url()?);
            }
        }
    }

    let watch = if options.quiet {
        FailureWatch::new(NullLogger)
    } else {
        FailureWatch::new(TracingLogger)
    };
    let registry = StylesheetRegistry::new(
        config,
        MemoryInjector::new(),
        DefaultFetcher::default(),
        watch.clone(),
    );

    let proxy = match &options.source {
        Source::Inline(text) => registry.css(text)?,
        Source::Path(path) => {
            let proxy = registry.load_css(path)?;
            let signal = proxy.loaded();
            tokio::select! {
                _ = signal.wait() => {}
                message = watch.failed() => bail!(message),
            }
            proxy
        }
    };

    render(&proxy, options.format)
}

/// Renders a loaded stylesheet in the requested format.
pub fn render(proxy: &ExportProxy, format: OutputFormat) -> Result<String> {
    let css = proxy
        .css()
        .ok_or_else(|| anyhow!("stylesheet {} is not loaded", proxy.key()))?;

    let output = match format {
        OutputFormat::Css => css,
        OutputFormat::Exports => proxy
            .exports()
            .iter()
            .map(|(name, scoped)| format!("{}\t{}\n", name, scoped))
            .collect(),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "css": css,
                "exports": proxy.exports(),
            });
            serde_json::to_string_pretty(&value)?
        }
    };
    Ok(output)
}

fn cwd_url() -> Result<String> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Url::from_directory_path(&cwd)
        .map(String::from)
        .map_err(|_| anyhow!("cannot express {} as a file URL", cwd.display()))
}
