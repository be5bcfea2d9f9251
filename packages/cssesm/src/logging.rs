// Logging
//
// Diagnostic side channel for stylesheet processing.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::level_filters::LevelFilter;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

/// Logger trait.
pub trait Logger {
    fn level(&self) -> LogLevel;
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }
}

/// Logger forwarding to `tracing` events under the `cssesm` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    /// Follows the most verbose level any installed subscriber accepts.
    fn level(&self) -> LogLevel {
        let max = LevelFilter::current();
        if max >= LevelFilter::DEBUG {
            LogLevel::Debug
        } else if max >= LevelFilter::INFO {
            LogLevel::Info
        } else if max >= LevelFilter::WARN {
            LogLevel::Warn
        } else {
            LogLevel::Error
        }
    }

    fn debug(&self, msg: &str) {
        tracing::debug!(target: "cssesm", "{}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "cssesm", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "cssesm", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "cssesm", "{}", msg);
    }
}

/// Logger that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Logger that keeps the messages at or above its level.
///
/// Clones share the same record, so a test can hand one clone to a registry
/// and inspect the other.
#[derive(Clone)]
pub struct MemoryLogger {
    level: LogLevel,
    records: Rc<RefCell<Vec<(LogLevel, String)>>>,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::with_level(LogLevel::Debug)
    }
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only messages at `level` or above.
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.borrow().clone()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        if !self.is_enabled(level) {
            return;
        }
        self.records.borrow_mut().push((level, msg.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn level(&self) -> LogLevel {
        self.level
    }
    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg);
    }
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }
    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}
