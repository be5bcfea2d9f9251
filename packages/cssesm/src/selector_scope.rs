//! Selector Scope
//!
//! Rewrites the class selectors of a selector that fall in local scope.
//!
//! Scope starts out local. `:local` / `:global` switch the scope of the
//! current nesting level; `:local(` / `:global(` open a nesting level with
//! that scope which ends at the matching `)`. Plain parentheses open a level
//! inheriting the current scope. Annotations never reach the output.

use once_cell::sync::Lazy;
use regex::Regex;

static SCOPE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(local|global)\s*\(?|\(|\)").unwrap());

static CLASS_SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.([a-z0-9_-]+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `:local(` or `:global(`
    ScopeOpen(Scope),
    /// `:local` or `:global` without a parenthesis, trailing whitespace included
    ScopeBare(Scope),
    ParenOpen,
    ParenClose,
    Literal(&'a str),
}

/// Split a selector into scope tokens and the literal text between them.
pub fn tokenize(selector: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in SCOPE_TOKEN_RE.captures_iter(selector) {
        let m = caps.get(0).unwrap();
        if m.start() != last {
            tokens.push(Token::Literal(&selector[last..m.start()]));
        }
        let token = match caps.get(1).map(|k| k.as_str()) {
            Some(keyword) => {
                let scope = if keyword == "local" {
                    Scope::Local
                } else {
                    Scope::Global
                };
                if m.as_str().ends_with('(') {
                    Token::ScopeOpen(scope)
                } else {
                    Token::ScopeBare(scope)
                }
            }
            None if m.as_str() == "(" => Token::ParenOpen,
            None => Token::ParenClose,
        };
        tokens.push(token);
        last = m.end();
    }

    if last < selector.len() {
        tokens.push(Token::Literal(&selector[last..]));
    }
    tokens
}

#[derive(Debug, Clone, Copy)]
struct Level {
    scope: Scope,
    emit_paren: bool,
}

/// Rewrite every class selector in local scope through `rewriter`.
///
/// `rewriter` receives the class name without its leading `.` and is called
/// once per local class token, in order.
pub fn rewrite_selector<F>(selector: &str, rewriter: &mut F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(selector.len() + 16);
    // The root level is never popped
    let mut stack = vec![Level {
        scope: Scope::Local,
        emit_paren: false,
    }];

    for token in tokenize(selector) {
        let top = stack.len() - 1;
        match token {
            Token::ScopeOpen(scope) => stack.push(Level {
                scope,
                emit_paren: false,
            }),
            Token::ScopeBare(scope) => stack[top].scope = scope,
            Token::ParenOpen => {
                let scope = stack[top].scope;
                stack.push(Level {
                    scope,
                    emit_paren: true,
                });
                out.push('(');
            }
            Token::ParenClose => {
                if stack.len() > 1 {
                    if let Some(level) = stack.pop() {
                        if level.emit_paren {
                            out.push(')');
                        }
                    }
                }
            }
            Token::Literal(text) => match stack[top].scope {
                Scope::Local => {
                    let rewritten = CLASS_SELECTOR_RE
                        .replace_all(text, |caps: &regex::Captures| {
                            format!(".{}", rewriter(&caps[1]))
                        });
                    out.push_str(&rewritten);
                }
                Scope::Global => out.push_str(text),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_tokenize_annotations() {
        assert_eq!(
            tokenize(":global(.a) :local .b"),
            vec![
                Token::ScopeOpen(Scope::Global),
                Token::Literal(".a"),
                Token::ParenClose,
                Token::Literal(" "),
                Token::ScopeBare(Scope::Local),
                Token::Literal(".b"),
            ]
        );
    }

    #[test]
    fn should_treat_whitespace_before_paren_as_part_of_annotation() {
        assert_eq!(
            tokenize(":local (.a)"),
            vec![
                Token::ScopeOpen(Scope::Local),
                Token::Literal(".a"),
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn should_leave_plain_text_as_single_literal() {
        assert_eq!(tokenize("div > a"), vec![Token::Literal("div > a")]);
        assert!(tokenize("").is_empty());
    }
}
