//! Class Name Mapper
//!
//! Turns a class name as written in the source into its scoped form:
//! `fold_case(name) + "-" + base36(hash(fold_case(name), seed))`.

use crate::hash::{hash_str, to_base36};

/// Maps raw class names to scoped class names for one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassNameMapper {
    seed: u32,
}

impl ClassNameMapper {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Derive the mapper for a stylesheet from its source key.
    pub fn for_key(key: &str) -> Self {
        Self::new(hash_str(key, 0))
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn map(&self, class_name: &str) -> String {
        let folded = fold_case(class_name);
        let hash = to_base36(hash_str(&folded, self.seed));
        format!("{}-{}", folded, hash)
    }
}

/// Fold upper-case runs into hyphenated lower-case runs.
///
/// The leading run is lower-cased in place; every later run of one or more
/// ASCII upper-case letters becomes `-` followed by the run lower-cased, so
/// `MyCoolCLASS` becomes `my-cool-class`.
pub fn fold_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut chars = name.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if !ch.is_ascii_uppercase() {
            break;
        }
        out.push(ch.to_ascii_lowercase());
        chars.next();
    }

    let mut in_run = false;
    for ch in chars {
        if ch.is_ascii_uppercase() {
            if !in_run {
                out.push('-');
                in_run = true;
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            in_run = false;
            out.push(ch);
        }
    }
    out
}
