//! CSS Parser Tests

use cssesm::css_parser::{compile, middleware, serialize, Element, ElementKind, Visitor};
use cssesm::{CssParseError, ParseErrorKind};
use pretty_assertions::assert_eq;
use std::cell::RefCell;

fn roundtrip(css: &str) -> String {
    let mut elements = compile(css).unwrap();
    serialize(&mut elements, &mut middleware(Vec::new()))
}

fn parse_error(css: &str) -> CssParseError {
    compile(css).unwrap_err()
}

#[test]
fn should_work_with_empty_css() {
    assert!(compile("").unwrap().is_empty());
    assert!(compile("  \n ").unwrap().is_empty());
    assert_eq!(roundtrip(""), "");
}

#[test]
fn should_serialize_rules_compactly() {
    assert_eq!(
        roundtrip(".a { color: red; background: blue }"),
        ".a{color:red;background:blue;}"
    );
}

#[test]
fn should_split_and_normalize_selector_lists() {
    let elements = compile(".a,\n  .b   .c { x: 1 }").unwrap();
    assert_eq!(elements[0].kind, ElementKind::Rule);
    assert_eq!(elements[0].props, vec![".a", ".b .c"]);
    assert_eq!(roundtrip(".a,\n  .b   .c { x: 1 }"), ".a,.b .c{x:1;}");
}

#[test]
fn should_drop_comments() {
    let elements = compile("/* hi */ .a { /* c */ color: red; }").unwrap();
    assert_eq!(elements[0].kind, ElementKind::Comment);
    assert_eq!(elements[0].props, vec![" hi "]);
    assert_eq!(roundtrip("/* hi */ .a { /* c */ color: red; }"), ".a{color:red;}");
    assert_eq!(roundtrip(".a/* x */.b { c: d }"), ".a.b{c:d;}");
}

#[test]
fn should_keep_at_rule_blocks() {
    assert_eq!(
        roundtrip("@media (max-width: 10px) { .a { color: red } }"),
        "@media (max-width: 10px){.a{color:red;}}"
    );
    assert_eq!(
        roundtrip("@font-face { font-family: x; src: url(a.woff) }"),
        "@font-face{font-family:x;src:url(a.woff);}"
    );
}

#[test]
fn should_keep_statement_at_rules() {
    let elements = compile("@import url(foo.css); .a{b:c}").unwrap();
    assert_eq!(
        elements[0].kind,
        ElementKind::AtRule {
            name: "import".to_string(),
            block: false
        }
    );
    assert_eq!(elements[0].props, vec!["url(foo.css)"]);
    assert_eq!(
        roundtrip("@import url(foo.css); .a{b:c}"),
        "@import url(foo.css);.a{b:c;}"
    );
}

#[test]
fn should_not_split_declarations_inside_strings_or_parens() {
    assert_eq!(
        roundtrip(".a { background: url(\"data:x;y\"); content: 'a;b' }"),
        ".a{background:url(\"data:x;y\");content:'a;b';}"
    );
    assert_eq!(
        roundtrip(".a { content: '}' }"),
        ".a{content:'}';}"
    );
}

#[test]
fn should_drop_empty_rules() {
    assert_eq!(roundtrip(".a {} .b { c: d }"), ".b{c:d;}");
}

#[test]
fn should_keep_nested_rules() {
    assert_eq!(
        roundtrip(".a { color: red; .b { color: blue } }"),
        ".a{color:red;.b{color:blue;}}"
    );
}

#[test]
fn should_keep_escaped_characters_in_selectors() {
    assert_eq!(roundtrip(".a\\:hover { x: y }"), ".a\\:hover{x:y;}");
}

#[test]
fn should_record_offsets() {
    let elements = compile(".a{}\n.b{}").unwrap();
    assert_eq!(elements[0].offset, 0);
    assert_eq!(elements[1].offset, 5);
}

#[test]
fn should_report_unclosed_blocks() {
    assert_eq!(
        parse_error(".a { color: red"),
        CssParseError::new(ParseErrorKind::UnclosedBlock, 3)
    );
}

#[test]
fn should_report_unexpected_close_brace() {
    assert_eq!(
        parse_error("}"),
        CssParseError::new(ParseErrorKind::UnexpectedCloseBrace, 0)
    );
}

#[test]
fn should_report_unterminated_strings_and_comments() {
    assert_eq!(
        parse_error(".a { content: 'x }"),
        CssParseError::new(ParseErrorKind::UnterminatedString, 14)
    );
    assert_eq!(
        parse_error("/* x"),
        CssParseError::new(ParseErrorKind::UnterminatedComment, 0)
    );
}

#[test]
fn should_visit_elements_with_their_parent_kind() {
    let seen: RefCell<Vec<(ElementKind, Option<ElementKind>)>> = RefCell::new(Vec::new());
    {
        let visitor: Visitor<'_> = Box::new(|element: &mut Element, parent: Option<&ElementKind>| {
            seen.borrow_mut()
                .push((element.kind.clone(), parent.cloned()));
        });
        let mut elements = compile("@media x { .a { b: c } }").unwrap();
        serialize(&mut elements, &mut middleware(vec![visitor]));
    }
    let media = ElementKind::AtRule {
        name: "media".to_string(),
        block: true,
    };
    assert_eq!(
        seen.into_inner(),
        vec![
            (media.clone(), None),
            (ElementKind::Rule, Some(media)),
            (ElementKind::Declaration, Some(ElementKind::Rule)),
        ]
    );
}

#[test]
fn should_serialize_mutations_made_by_visitors() {
    let visitor: Visitor<'_> = Box::new(|element: &mut Element, _parent: Option<&ElementKind>| {
        if element.kind == ElementKind::Rule {
            element.props.push(".extra".to_string());
        }
    });
    let mut elements = compile(".a { b: c }").unwrap();
    assert_eq!(
        serialize(&mut elements, &mut middleware(vec![visitor])),
        ".a,.extra{b:c;}"
    );
}
