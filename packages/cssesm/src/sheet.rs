//! Page stylesheet
//!
//! Every stylesheet owns one slot: reserved when a remote load is requested,
//! or once literal CSS has parsed. The injected text is the concatenation of
//! all slots in reservation order.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives the full contents of the page `<style>` element.
pub trait StyleInjector {
    fn inject(&self, css_text: &str);
}

/// Injector that keeps the last injected text.
#[derive(Clone, Default)]
pub struct MemoryInjector {
    contents: Rc<RefCell<String>>,
    injections: Rc<RefCell<usize>>,
}

impl MemoryInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }

    pub fn injection_count(&self) -> usize {
        *self.injections.borrow()
    }
}

impl StyleInjector for MemoryInjector {
    fn inject(&self, css_text: &str) {
        *self.contents.borrow_mut() = css_text.to_string();
        *self.injections.borrow_mut() += 1;
    }
}

/// Ordered slots backing the injected stylesheet.
pub struct PageSheet {
    slots: Vec<String>,
    injector: Box<dyn StyleInjector>,
}

impl PageSheet {
    pub fn new(injector: Box<dyn StyleInjector>) -> Self {
        Self {
            slots: Vec::new(),
            injector,
        }
    }

    pub fn reserve_slot(&mut self) -> usize {
        self.slots.push(String::new());
        self.slots.len() - 1
    }

    /// Fill a slot and push the new sheet text to the injector.
    pub fn write_slot(&mut self, slot: usize, css: &str) {
        if let Some(existing) = self.slots.get_mut(slot) {
            *existing = css.to_string();
        }
        self.injector.inject(&self.text());
    }

    pub fn text(&self) -> String {
        self.slots.concat()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
