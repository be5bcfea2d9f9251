//! Rule Visitor
//!
//! Middleware visitor that scopes the selectors of style rules. Rules whose
//! parent is a `@keyframes` block are keyframe steps (`from`, `50%`) and are
//! left alone.

use crate::css_parser::{Element, ElementKind, Visitor};
use crate::selector_scope::rewrite_selector;

/// Build a visitor rewriting local class selectors through `rewriter`.
pub fn modulify<'a, F>(mut rewriter: F) -> Visitor<'a>
where
    F: FnMut(&str) -> String + 'a,
{
    Box::new(move |element: &mut Element, parent: Option<&ElementKind>| {
        let in_keyframes = parent.is_some_and(ElementKind::is_keyframes);
        if element.kind != ElementKind::Rule || in_keyframes {
            return;
        }
        element.props = element
            .props
            .iter()
            .map(|selector| rewrite_selector(selector, &mut rewriter))
            .filter(|selector| !selector.trim().is_empty())
            .collect();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css_parser::{compile, middleware, serialize};

    fn suffixed(css: &str) -> String {
        let mut elements = compile(css).unwrap();
        let mut middleware = middleware(vec![modulify(|name: &str| format!("{}-x", name))]);
        serialize(&mut elements, &mut middleware)
    }

    #[test]
    fn should_rewrite_rule_selectors() {
        assert_eq!(
            suffixed(".a, .b > .c { color: red }"),
            ".a-x,.b-x > .c-x{color:red;}"
        );
    }

    #[test]
    fn should_skip_keyframe_steps() {
        assert_eq!(
            suffixed("@keyframes spin { from { top: 0 } 50.5% { top: 1px } }"),
            "@keyframes spin{from{top:0;}50.5%{top:1px;}}"
        );
    }

    #[test]
    fn should_drop_selectors_that_become_empty() {
        assert_eq!(suffixed(":global, .a { color: red }"), ".a-x{color:red;}");
    }
}
