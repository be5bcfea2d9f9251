//! Test Utils
//!
//! Shared helpers for the stylesheet and registry tests.

use cssesm::fetch::InMemoryFetcher;
use cssesm::logging::MemoryLogger;
use cssesm::sheet::MemoryInjector;
use cssesm::{CssModulesConfig, StylesheetRegistry};

#[allow(dead_code)]
pub const BASE_URL: &str = "https://example.com/app/";

#[allow(dead_code)]
pub struct Harness {
    pub registry: StylesheetRegistry,
    pub injector: MemoryInjector,
    pub fetcher: InMemoryFetcher,
    pub logger: MemoryLogger,
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with(CssModulesConfig::default().with_base_url(BASE_URL))
}

#[allow(dead_code)]
pub fn harness_with(config: CssModulesConfig) -> Harness {
    let injector = MemoryInjector::new();
    let fetcher = InMemoryFetcher::new();
    let logger = MemoryLogger::new();
    let registry = StylesheetRegistry::new(
        config,
        injector.clone(),
        fetcher.clone(),
        logger.clone(),
    );
    Harness {
        registry,
        injector,
        fetcher,
        logger,
    }
}

/// Rewriter that tags every class so scoped tokens are easy to spot.
#[allow(dead_code)]
pub fn tag(name: &str) -> String {
    format!("{}_x", name)
}

#[allow(dead_code)]
pub fn assert_contains(actual: &str, expected: &str) {
    assert!(
        actual.contains(expected),
        "Expected '{}' to contain '{}'",
        actual,
        expected
    );
}

#[allow(dead_code)]
pub fn assert_not_contains(actual: &str, expected: &str) {
    assert!(
        !actual.contains(expected),
        "Expected '{}' to not contain '{}'",
        actual,
        expected
    );
}
