//! Stylesheet Registry
//!
//! Process-wide cache of scoped stylesheets and the entry points `css`,
//! `css_template` and `load_css`. Create one per application; it is never
//! reset, and an entry once created is reused for every later request with
//! the same key.
//!
//! The registry is single-threaded. `load_css` spawns its fetch with
//! [`tokio::task::spawn_local`], so it must be called from inside a
//! [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::config::CssModulesConfig;
use crate::error::Result;
use crate::fetch::{DefaultFetcher, Fetcher};
use crate::logging::{LogLevel, Logger, TracingLogger};
use crate::sheet::{MemoryInjector, PageSheet, StyleInjector};
use crate::style_url_resolver::resolve_style_url;
use crate::stylesheet::{ExportProxy, SourceKey, Stylesheet};

#[derive(Clone)]
pub struct StylesheetRegistry {
    inner: Rc<RegistryInner>,
}

struct RegistryInner {
    config: Rc<CssModulesConfig>,
    cache: RefCell<HashMap<SourceKey, Rc<Stylesheet>>>,
    page: Rc<RefCell<PageSheet>>,
    fetcher: Rc<dyn Fetcher>,
    logger: Rc<dyn Logger>,
}

impl StylesheetRegistry {
    pub fn new<I, F, L>(config: CssModulesConfig, injector: I, fetcher: F, logger: L) -> Self
    where
        I: StyleInjector + 'static,
        F: Fetcher + 'static,
        L: Logger + 'static,
    {
        StylesheetRegistry {
            inner: Rc::new(RegistryInner {
                config: Rc::new(config),
                cache: RefCell::new(HashMap::new()),
                page: Rc::new(RefCell::new(PageSheet::new(Box::new(injector)))),
                fetcher: Rc::new(fetcher),
                logger: Rc::new(logger),
            }),
        }
    }

    /// Registry with the default configuration, an in-memory page sheet,
    /// file/http fetching and `tracing` diagnostics.
    pub fn with_defaults() -> Self {
        Self::new(
            CssModulesConfig::default(),
            MemoryInjector::new(),
            DefaultFetcher::default(),
            TracingLogger,
        )
    }

    pub fn config(&self) -> &CssModulesConfig {
        &self.inner.config
    }

    /// Scope literal CSS. Processing happens before this returns.
    pub fn css(&self, source: &str) -> Result<ExportProxy> {
        let key = SourceKey::Literal(source.to_string());
        if let Some(sheet) = self.cached(&key) {
            return Ok(ExportProxy::new(sheet));
        }

        let sheet = Rc::new(self.create(key.clone()));
        sheet.process(source)?;
        self.inner.cache.borrow_mut().insert(key, sheet.clone());
        Ok(ExportProxy::new(sheet))
    }

    /// Scope CSS assembled from template pieces: each string is followed by
    /// the value at the same index, and a missing value contributes nothing.
    pub fn css_template<V: Display>(&self, strings: &[&str], values: &[Option<V>]) -> Result<ExportProxy> {
        let mut source = String::new();
        for (i, string) in strings.iter().enumerate() {
            source.push_str(string);
            if let Some(Some(value)) = values.get(i) {
                source.push_str(&value.to_string());
            }
        }
        self.css(&source)
    }

    /// Scope the stylesheet at `path`, resolved against the configured base URL.
    ///
    /// Returns at once; the proxy resolves names immediately and its loaded
    /// signal fires once the fetch completes. Requests for the same URL share
    /// one stylesheet and one fetch. A failed fetch is logged and leaves the
    /// stylesheet pending for good.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a `LocalSet`.
    pub fn load_css(&self, path: &str) -> Result<ExportProxy> {
        let url = resolve_style_url(self.inner.config.base_url(), path)?;
        let key = SourceKey::Url(url.clone());
        if let Some(sheet) = self.cached(&key) {
            return Ok(ExportProxy::new(sheet));
        }

        let sheet = Rc::new(self.create(key.clone()));
        // The page slot keeps request order even if fetches finish out of order
        sheet.reserve_slot();
        // Reserve the entry before fetching so concurrent requests share it
        self.inner.cache.borrow_mut().insert(key, sheet.clone());

        let fetcher = self.inner.fetcher.clone();
        let logger = self.inner.logger.clone();
        let task_sheet = sheet.clone();
        tokio::task::spawn_local(async move {
            if logger.is_enabled(LogLevel::Debug) {
                logger.debug(&format!("Fetching {}", url));
            }
            match fetcher.fetch(&url).await {
                Ok(source) => {
                    if let Err(e) = task_sheet.process(&source) {
                        logger.error(&format!("Failed to process {}: {}", url, e));
                    }
                }
                Err(e) => logger.error(&e.to_string()),
            }
        });

        Ok(ExportProxy::new(sheet))
    }

    /// Current contents of the injected page stylesheet.
    pub fn sheet_text(&self) -> String {
        self.inner.page.borrow().text()
    }

    pub fn len(&self) -> usize {
        self.inner.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, key: &SourceKey) -> Option<Rc<Stylesheet>> {
        self.inner.cache.borrow().get(key).cloned()
    }

    fn create(&self, key: SourceKey) -> Stylesheet {
        Stylesheet::new(
            key,
            self.inner.page.clone(),
            self.inner.config.clone(),
            self.inner.logger.clone(),
        )
    }
}

impl fmt::Debug for StylesheetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylesheetRegistry")
            .field("config", &self.inner.config)
            .field("stylesheets", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::InMemoryFetcher;
    use crate::logging::NullLogger;

    fn registry() -> StylesheetRegistry {
        StylesheetRegistry::new(
            CssModulesConfig::default(),
            MemoryInjector::new(),
            InMemoryFetcher::new(),
            NullLogger,
        )
    }

    #[test]
    fn should_not_hold_page_slots_for_malformed_literals() {
        let registry = registry();
        assert!(registry.css(".a { b: c").is_err());
        assert!(registry.css(".d { e: f").is_err());
        assert!(registry.inner.page.borrow().is_empty());

        let proxy = registry.css(".a { b: c }").unwrap();
        assert_eq!(registry.inner.page.borrow().len(), 1);
        assert_eq!(registry.sheet_text(), proxy.css().unwrap());
    }

    #[tokio::test]
    async fn should_reserve_slot_when_load_is_requested() {
        tokio::task::LocalSet::new()
            .run_until(async {
                let registry = registry();
                registry.load_css("a.css").unwrap();
                assert_eq!(registry.inner.page.borrow().len(), 1);

                // Later requests share the reserved slot
                registry.load_css("./a.css").unwrap();
                assert_eq!(registry.inner.page.borrow().len(), 1);
            })
            .await;
    }
}
