// Failure Watch
//
// A loader whose fetch fails never resolves its loaded signal, so the CLI
// listens for the error the registry logs instead.

use cssesm::logging::{LogLevel, Logger};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::Notify;

/// Logger forwarding to `inner` that also remembers the last error.
#[derive(Clone)]
pub struct FailureWatch {
    inner: Rc<dyn Logger>,
    notify: Rc<Notify>,
    last_error: Rc<RefCell<Option<String>>>,
}

impl FailureWatch {
    pub fn new<L: Logger + 'static>(inner: L) -> Self {
        Self {
            inner: Rc::new(inner),
            notify: Rc::new(Notify::new()),
            last_error: Rc::new(RefCell::new(None)),
        }
    }

    /// Completes once an error has been logged, returning its message.
    pub async fn failed(&self) -> String {
        self.notify.notified().await;
        self.last_error.borrow().clone().unwrap_or_default()
    }
}

impl Logger for FailureWatch {
    fn level(&self) -> LogLevel {
        self.inner.level()
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        self.inner.is_enabled(level)
    }

    fn debug(&self, msg: &str) {
        self.inner.debug(msg);
    }

    fn info(&self, msg: &str) {
        self.inner.info(msg);
    }

    fn warn(&self, msg: &str) {
        self.inner.warn(msg);
    }

    // Recorded even when the inner logger is silent
    fn error(&self, msg: &str) {
        self.inner.error(msg);
        *self.last_error.borrow_mut() = Some(msg.to_string());
        self.notify.notify_one();
    }
}
