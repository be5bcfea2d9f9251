//! Stylesheet
//!
//! One scoped stylesheet: its seed, its processing state, the class names its
//! rules produced and the signal that fires once its CSS is known. Callers see
//! it through [`ExportProxy`].

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tokio::sync::watch;

use crate::class_name::ClassNameMapper;
use crate::config::CssModulesConfig;
use crate::css_parser::{compile, middleware, serialize};
use crate::error::Result;
use crate::logging::{LogLevel, Logger};
use crate::rule_visitor::modulify;
use crate::sheet::PageSheet;

/// What a stylesheet was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    /// Literal CSS text
    Literal(String),
    /// Absolute URL
    Url(String),
}

impl SourceKey {
    pub fn as_str(&self) -> &str {
        match self {
            SourceKey::Literal(text) => text,
            SourceKey::Url(url) => url,
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKey::Literal(text) => write!(f, "inline css ({} bytes)", text.len()),
            SourceKey::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetState {
    Pending,
    Processing,
    /// Terminal; holds the final CSS text
    Loaded(String),
}

/// Resolves once, when the stylesheet's CSS has been processed.
#[derive(Debug, Clone)]
pub struct LoadedSignal {
    rx: watch::Receiver<bool>,
}

impl LoadedSignal {
    pub fn is_loaded(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the stylesheet is loaded. Never completes if it never loads.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|loaded| *loaded).await.is_err() {
            // Stylesheet dropped while pending
            std::future::pending::<()>().await;
        }
    }
}

pub struct Stylesheet {
    key: SourceKey,
    mapper: ClassNameMapper,
    slot: Cell<Option<usize>>,
    state: RefCell<StylesheetState>,
    /// scoped name -> original name, in first-emitted order
    found: RefCell<IndexMap<String, String>>,
    loaded_tx: watch::Sender<bool>,
    page: Rc<RefCell<PageSheet>>,
    config: Rc<CssModulesConfig>,
    logger: Rc<dyn Logger>,
}

impl Stylesheet {
    pub(crate) fn new(
        key: SourceKey,
        page: Rc<RefCell<PageSheet>>,
        config: Rc<CssModulesConfig>,
        logger: Rc<dyn Logger>,
    ) -> Self {
        let mapper = ClassNameMapper::for_key(key.as_str());
        let (loaded_tx, _) = watch::channel(false);
        Stylesheet {
            key,
            mapper,
            slot: Cell::new(None),
            state: RefCell::new(StylesheetState::Pending),
            found: RefCell::new(IndexMap::new()),
            loaded_tx,
            page,
            config,
            logger,
        }
    }

    pub fn key(&self) -> &SourceKey {
        &self.key
    }

    pub fn state(&self) -> StylesheetState {
        self.state.borrow().clone()
    }

    /// Page slot of this stylesheet, reserved on first use.
    pub(crate) fn reserve_slot(&self) -> usize {
        if let Some(slot) = self.slot.get() {
            return slot;
        }
        let slot = self.page.borrow_mut().reserve_slot();
        self.slot.set(Some(slot));
        slot
    }

    /// Parse, scope and serialize `source`, then publish the result.
    ///
    /// Publishing happens in order: the CSS is cached on the stylesheet, the
    /// loaded signal fires, and the page sheet is updated. A stylesheet that is
    /// already loaded returns its cached CSS without reprocessing. On a parse
    /// error the stylesheet stays pending.
    pub fn process(&self, source: &str) -> Result<String> {
        if let StylesheetState::Loaded(css) = &*self.state.borrow() {
            return Ok(css.clone());
        }
        *self.state.borrow_mut() = StylesheetState::Processing;

        let mut elements = match compile(source) {
            Ok(elements) => elements,
            Err(e) => {
                *self.state.borrow_mut() = StylesheetState::Pending;
                return Err(e.into());
            }
        };

        let css = {
            let mapper = self.mapper;
            let found = &self.found;
            let mut middleware = middleware(vec![modulify(move |name: &str| {
                let mapped = mapper.map(name);
                found
                    .borrow_mut()
                    .entry(mapped.clone())
                    .or_insert_with(|| name.to_string());
                mapped
            })]);
            serialize(&mut elements, &mut middleware)
        };

        *self.state.borrow_mut() = StylesheetState::Loaded(css.clone());
        self.loaded_tx.send_replace(true);
        let slot = self.reserve_slot();
        self.page.borrow_mut().write_slot(slot, &css);

        if self.logger.is_enabled(LogLevel::Debug) {
            self.logger.debug(&format!(
                "Scoped {} ({} classes)",
                self.key,
                self.found.borrow().len()
            ));
        }
        Ok(css)
    }
}

/// Result of a property-style lookup on an [`ExportProxy`].
#[derive(Debug, Clone)]
pub enum Export {
    Loaded(LoadedSignal),
    Class(String),
}

/// Name-resolution handle for one stylesheet.
#[derive(Clone)]
pub struct ExportProxy {
    sheet: Rc<Stylesheet>,
}

impl ExportProxy {
    pub(crate) fn new(sheet: Rc<Stylesheet>) -> Self {
        Self { sheet }
    }

    /// Scoped name for `name`.
    ///
    /// Available before the CSS has loaded. Once loaded, a name that no rule
    /// produced is reported through the logger; the mapped name is still returned.
    pub fn resolve(&self, name: &str) -> String {
        let mapped = self.sheet.mapper.map(name);
        if self.sheet.config.warn_on_missing_export
            && self.is_loaded()
            && !self.sheet.found.borrow().contains_key(&mapped)
        {
            self.sheet
                .logger
                .warn(&format!("Loaded CSS didn't have an export for \"{}\"", name));
        }
        mapped
    }

    /// Property-style access; the configured loaded key yields the loaded signal.
    pub fn get(&self, key: &str) -> Export {
        if key == self.sheet.config.loaded_key {
            Export::Loaded(self.loaded())
        } else {
            Export::Class(self.resolve(key))
        }
    }

    pub fn loaded(&self) -> LoadedSignal {
        LoadedSignal {
            rx: self.sheet.loaded_tx.subscribe(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.sheet.state.borrow(), StylesheetState::Loaded(_))
    }

    pub fn state(&self) -> StylesheetState {
        self.sheet.state()
    }

    pub fn css(&self) -> Option<String> {
        match &*self.sheet.state.borrow() {
            StylesheetState::Loaded(css) => Some(css.clone()),
            _ => None,
        }
    }

    pub fn seed(&self) -> u32 {
        self.sheet.mapper.seed()
    }

    pub fn key(&self) -> &SourceKey {
        self.sheet.key()
    }

    /// Original -> scoped names for every class the rules produced.
    pub fn exports(&self) -> IndexMap<String, String> {
        self.sheet
            .found
            .borrow()
            .iter()
            .map(|(scoped, original)| (original.clone(), scoped.clone()))
            .collect()
    }

    /// Whether two proxies front the same stylesheet.
    pub fn same_stylesheet(&self, other: &ExportProxy) -> bool {
        Rc::ptr_eq(&self.sheet, &other.sheet)
    }
}

impl fmt::Debug for ExportProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportProxy")
            .field("key", &self.sheet.key)
            .field("seed", &self.seed())
            .field("state", &self.state())
            .finish()
    }
}
