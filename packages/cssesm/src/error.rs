//! Error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CssModulesError>;

#[derive(Debug, Error)]
pub enum CssModulesError {
    #[error(transparent)]
    Parse(#[from] CssParseError),

    #[error("invalid stylesheet url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Malformed CSS, with the byte offset where the problem starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct CssParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl CssParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unclosed block")]
    UnclosedBlock,
    #[error("unexpected '}}'")]
    UnexpectedCloseBrace,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Stylesheet fetch error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn not_found(url: &str) -> Self {
        Self {
            url: url.to_string(),
            message: format!("Stylesheet not found: {}", url),
        }
    }

    pub fn load_failed(url: &str, reason: &str) -> Self {
        Self {
            url: url.to_string(),
            message: format!("Failed to load {}: {}", url, reason),
        }
    }
}
