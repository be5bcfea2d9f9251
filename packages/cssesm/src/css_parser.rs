//! CSS Parser
//!
//! Parses CSS text into a small rule tree and serializes it back into compact
//! CSS. Serialization runs a middleware over every element first, which is
//! how selectors get rewritten before they are written out.

use crate::error::{CssParseError, ParseErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Style rule; `props` holds the selector list
    Rule,
    /// At-rule such as `@media` (`name` is `media`); `props` holds the prelude
    AtRule { name: String, block: bool },
    /// `props` holds `[property, value]`, or the raw text when there is no colon
    Declaration,
    /// `props` holds the comment text
    Comment,
}

impl ElementKind {
    pub fn is_keyframes(&self) -> bool {
        match self {
            ElementKind::AtRule { name, .. } => name.to_ascii_lowercase().ends_with("keyframes"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub props: Vec<String>,
    pub children: Vec<Element>,
    /// Byte offset of the element in the source
    pub offset: usize,
}

impl Element {
    fn new(kind: ElementKind, props: Vec<String>, offset: usize) -> Self {
        Element {
            kind,
            props,
            children: Vec::new(),
            offset,
        }
    }
}

/// A visitor run on every element before it is stringified.
pub type Visitor<'a> = Box<dyn FnMut(&mut Element, Option<&ElementKind>) + 'a>;

/// An ordered collection of visitors.
pub struct Middleware<'a> {
    visitors: Vec<Visitor<'a>>,
}

impl<'a> Middleware<'a> {
    fn visit(&mut self, element: &mut Element, parent: Option<&ElementKind>) {
        for visitor in self.visitors.iter_mut() {
            visitor(element, parent);
        }
    }
}

pub fn middleware(visitors: Vec<Visitor<'_>>) -> Middleware<'_> {
    Middleware { visitors }
}

/// Parse CSS source into a rule tree.
pub fn compile(source: &str) -> Result<Vec<Element>, CssParseError> {
    let mut parser = Parser {
        src: source,
        bytes: source.as_bytes(),
        pos: 0,
    };
    parser.parse_block(None)
}

/// Serialize a rule tree, running `middleware` over each element in document order.
pub fn serialize(elements: &mut [Element], middleware: &mut Middleware<'_>) -> String {
    serialize_children(elements, None, middleware)
}

fn serialize_children(
    elements: &mut [Element],
    parent: Option<&ElementKind>,
    middleware: &mut Middleware<'_>,
) -> String {
    let mut out = String::new();
    for element in elements.iter_mut() {
        middleware.visit(element, parent);
        let kind = element.kind.clone();
        let children = serialize_children(&mut element.children, Some(&kind), middleware);
        out.push_str(&stringify(element, &children));
    }
    out
}

/// Write out one element given its already serialized children.
pub fn stringify(element: &Element, children: &str) -> String {
    match &element.kind {
        ElementKind::Rule => {
            if element.props.is_empty() || children.is_empty() {
                String::new()
            } else {
                format!("{}{{{}}}", element.props.join(","), children)
            }
        }
        ElementKind::AtRule { name, block } => {
            let prelude = match element.props.first() {
                Some(params) if !params.is_empty() => format!("@{} {}", name, params),
                _ => format!("@{}", name),
            };
            if *block {
                format!("{}{{{}}}", prelude, children)
            } else {
                format!("{};", prelude)
            }
        }
        ElementKind::Declaration => match element.props.as_slice() {
            [property, value] => format!("{}:{};", property, value),
            [raw] => format!("{};", raw),
            _ => String::new(),
        },
        ElementKind::Comment => String::new(),
    }
}

/// Splits a selector list on its top-level commas.
pub fn split_selector_list(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = 0;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' | '\'' => match quote {
                Some(q) if q == ch => quote = None,
                None => quote = Some(ch),
                _ => {}
            },
            _ if quote.is_some() => {}
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                result.push(text[prev..i].trim().to_string());
                prev = i + 1;
            }
            _ => {}
        }
    }

    result.push(text[prev..].trim().to_string());
    result.retain(|s| !s.is_empty());
    result
}

/// Trim and collapse whitespace runs outside of strings into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for ch in text.trim().chars() {
        if quote.is_none() && !escaped && ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);

        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
        } else if ch == '"' || ch == '\'' {
            quote = Some(ch);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Block,
    Semicolon,
    CloseBrace,
    Eof,
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek(0) {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    /// `open` is the offset of the `{` that started this block, `None` at top level.
    fn parse_block(&mut self, open: Option<usize>) -> Result<Vec<Element>, CssParseError> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            match self.peek(0) {
                None => {
                    return match open {
                        Some(offset) => Err(CssParseError::new(ParseErrorKind::UnclosedBlock, offset)),
                        None => Ok(elements),
                    };
                }
                Some(b'}') => {
                    if open.is_none() {
                        return Err(CssParseError::new(
                            ParseErrorKind::UnexpectedCloseBrace,
                            start,
                        ));
                    }
                    self.pos += 1;
                    return Ok(elements);
                }
                Some(b';') => {
                    self.pos += 1;
                    continue;
                }
                Some(b'/') if self.peek(1) == Some(b'*') => {
                    self.skip_comment()?;
                    let text = &self.src[start + 2..self.pos - 2];
                    elements.push(Element::new(
                        ElementKind::Comment,
                        vec![text.to_string()],
                        start,
                    ));
                    continue;
                }
                Some(_) => {}
            }

            let (prelude, terminator) = self.read_prelude()?;
            let prelude = collapse_whitespace(&prelude);
            match terminator {
                Terminator::Block => {
                    let brace = self.pos;
                    self.pos += 1;
                    let mut element = block_element(&prelude, start);
                    element.children = self.parse_block(Some(brace))?;
                    elements.push(element);
                }
                Terminator::Semicolon => {
                    self.pos += 1;
                    if !prelude.is_empty() {
                        elements.push(statement_element(&prelude, start));
                    }
                }
                Terminator::CloseBrace | Terminator::Eof => {
                    if !prelude.is_empty() {
                        elements.push(statement_element(&prelude, start));
                    }
                }
            }
        }
    }

    /// Read up to the next `{`, `}` or top-level `;`, dropping comments.
    fn read_prelude(&mut self) -> Result<(String, Terminator), CssParseError> {
        let mut text = String::new();
        let mut segment = self.pos;
        let mut depth = 0usize;

        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => {
                    self.pos += 2;
                    continue;
                }
                b'"' | b'\'' => {
                    self.skip_string(b)?;
                    continue;
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    text.push_str(&self.src[segment..self.pos]);
                    self.skip_comment()?;
                    segment = self.pos;
                    continue;
                }
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b'{' | b'}' => {
                    text.push_str(&self.src[segment..self.pos]);
                    let terminator = if b == b'{' {
                        Terminator::Block
                    } else {
                        Terminator::CloseBrace
                    };
                    return Ok((text, terminator));
                }
                b';' if depth == 0 => {
                    text.push_str(&self.src[segment..self.pos]);
                    return Ok((text, Terminator::Semicolon));
                }
                _ => {}
            }
            self.pos += 1;
        }

        // An escape at the very end may step past the input
        self.pos = self.bytes.len();
        text.push_str(&self.src[segment.min(self.pos)..]);
        Ok((text, Terminator::Eof))
    }

    fn skip_string(&mut self, quote: u8) -> Result<(), CssParseError> {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            if b == b'\\' {
                self.pos += 2;
                continue;
            }
            self.pos += 1;
            if b == quote {
                return Ok(());
            }
        }
        Err(CssParseError::new(ParseErrorKind::UnterminatedString, start))
    }

    fn skip_comment(&mut self) -> Result<(), CssParseError> {
        let start = self.pos;
        match self.src[start + 2..].find("*/") {
            Some(end) => {
                self.pos = start + 2 + end + 2;
                Ok(())
            }
            None => Err(CssParseError::new(ParseErrorKind::UnterminatedComment, start)),
        }
    }
}

fn block_element(prelude: &str, offset: usize) -> Element {
    match prelude.strip_prefix('@') {
        Some(at_rule) => {
            let (name, params) = split_at_rule(at_rule);
            Element::new(
                ElementKind::AtRule { name, block: true },
                vec![params],
                offset,
            )
        }
        None => Element::new(ElementKind::Rule, split_selector_list(prelude), offset),
    }
}

fn statement_element(prelude: &str, offset: usize) -> Element {
    if let Some(at_rule) = prelude.strip_prefix('@') {
        let (name, params) = split_at_rule(at_rule);
        return Element::new(
            ElementKind::AtRule { name, block: false },
            vec![params],
            offset,
        );
    }
    let props = match prelude.find(':') {
        Some(colon) => vec![
            prelude[..colon].trim().to_string(),
            prelude[colon + 1..].trim().to_string(),
        ],
        None => vec![prelude.to_string()],
    };
    Element::new(ElementKind::Declaration, props, offset)
}

fn split_at_rule(at_rule: &str) -> (String, String) {
    let end = at_rule
        .find(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
        .unwrap_or(at_rule.len());
    (
        at_rule[..end].to_string(),
        at_rule[end..].trim().to_string(),
    )
}
