//! Recursive-descent parser for ICU MessageFormat templates
//!
//! Supported syntax:
//!
//! - `{name}` simple arguments
//! - `{name, number|date|time[, style]}` formatted arguments
//! - `{name, plural|selectordinal, [offset:N] =0 {…} one {…} other {…}}`
//! - `{name, select, key {…} other {…}}`
//! - `#` inside plural arms, apostrophe quoting (`''`, `'{literal}'`)

use super::FormatError;
use crate::pluralization::PluralKind;

/// Nesting deeper than this is rejected instead of recursing further
const MAX_DEPTH: usize = 32;

/// A parsed message: a sequence of elements
pub type Message = Vec<Element>;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Literal text, with quoting already resolved
    Literal(String),
    /// `{name}`
    Argument(String),
    /// `{name, number[, style]}`
    Number { name: String, style: Option<String> },
    /// `{name, date[, style]}`
    Date { name: String, style: Option<String> },
    /// `{name, time[, style]}`
    Time { name: String, style: Option<String> },
    /// `{name, plural, …}` or `{name, selectordinal, …}`
    Plural(PluralElement),
    /// `{name, select, …}`
    Select { name: String, arms: Vec<Arm> },
    /// `#` inside a plural arm
    Pound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluralElement {
    pub name: String,
    pub kind: PluralKind,
    pub offset: f64,
    pub arms: Vec<Arm>,
}

/// Arm selector: `=N` or a keyword
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// `=N`, compared against the raw value
    Exact(f64),
    /// Plural category or select value
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    pub selector: Selector,
    pub message: Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Plural,
    Other,
}

/// Parse a template into a [`Message`]
pub fn parse(source: &str) -> Result<Message, FormatError> {
    let mut parser = Parser { src: source, pos: 0 };
    let message = parser.message(0, Parent::Root)?;
    if parser.pos < source.len() {
        return Err(parser.error("unexpected '}'"));
    }
    Ok(message)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError::Syntax {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), FormatError> {
        if self.bump_if(expected) {
            Ok(())
        } else {
            match self.peek() {
                Some(found) => Err(self.error(format!("expected '{expected}', found '{found}'"))),
                None => Err(self.error(format!("expected '{expected}', found end of input"))),
            }
        }
    }

    /// Parse elements until a closing `}` (nested) or end of input (root)
    fn message(&mut self, depth: usize, parent: Parent) -> Result<Message, FormatError> {
        if depth > MAX_DEPTH {
            return Err(self.error("message nested too deeply"));
        }

        let mut elements = Vec::new();
        let mut literal = String::new();

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    flush(&mut literal, &mut elements);
                    elements.push(self.argument(depth)?);
                }
                '}' => break,
                '#' if parent == Parent::Plural => {
                    self.bump();
                    flush(&mut literal, &mut elements);
                    elements.push(Element::Pound);
                }
                '\'' => self.quoted(parent, &mut literal),
                _ => {
                    self.bump();
                    literal.push(c);
                }
            }
        }

        flush(&mut literal, &mut elements);
        Ok(elements)
    }

    /// Apostrophe handling; the opening `'` is at the current position
    fn quoted(&mut self, parent: Parent, literal: &mut String) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                literal.push('\'');
            }
            Some(c) if c == '{' || c == '}' || (c == '#' && parent == Parent::Plural) => {
                // Quoted literal runs to the next unpaired apostrophe or end of input
                while let Some(c) = self.bump() {
                    if c == '\'' {
                        if self.peek() == Some('\'') {
                            self.bump();
                            literal.push('\'');
                        } else {
                            return;
                        }
                    } else {
                        literal.push(c);
                    }
                }
            }
            _ => literal.push('\''),
        }
    }

    fn identifier(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',' | '#' | '\'') {
                break;
            }
            self.bump();
        }
        &src[start..self.pos]
    }

    /// `{ name [, type [, style | arms]] }`; the `{` is at the current position
    fn argument(&mut self, depth: usize) -> Result<Element, FormatError> {
        self.expect('{')?;
        self.skip_whitespace();

        let name = self.identifier().to_string();
        if name.is_empty() {
            return Err(self.error("expected argument name"));
        }
        self.skip_whitespace();

        if self.bump_if('}') {
            return Ok(Element::Argument(name));
        }
        self.expect(',')?;
        self.skip_whitespace();

        let kind_start = self.pos;
        let kind = self.identifier();
        self.skip_whitespace();

        match kind {
            "number" | "date" | "time" => {
                let style = self.style()?;
                Ok(match kind {
                    "number" => Element::Number { name, style },
                    "date" => Element::Date { name, style },
                    _ => Element::Time { name, style },
                })
            }
            "plural" | "selectordinal" => {
                self.expect(',')?;
                self.skip_whitespace();
                let offset = self.offset()?;
                let kind = if kind == "plural" {
                    PluralKind::Cardinal
                } else {
                    PluralKind::Ordinal
                };
                let arms = self.arms(depth, Parent::Plural)?;
                Ok(Element::Plural(PluralElement {
                    name,
                    kind,
                    offset,
                    arms,
                }))
            }
            "select" => {
                self.expect(',')?;
                let arms = self.arms(depth, Parent::Other)?;
                Ok(Element::Select { name, arms })
            }
            "" => Err(self.error("expected argument type")),
            other => Err(FormatError::Syntax {
                offset: kind_start,
                message: format!("unknown argument type '{other}'"),
            }),
        }
    }

    /// Optional `, style` followed by the closing `}`
    fn style(&mut self) -> Result<Option<String>, FormatError> {
        if self.bump_if('}') {
            return Ok(None);
        }
        self.expect(',')?;

        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                '}' => break,
                '{' => return Err(self.error("unexpected '{' in argument style")),
                _ => {
                    self.bump();
                }
            }
        }
        let style = self.src[start..self.pos].trim().to_string();
        self.expect('}')?;

        if style.is_empty() {
            return Err(self.error("empty argument style"));
        }
        Ok(Some(style))
    }

    /// Optional `offset:N`
    fn offset(&mut self) -> Result<f64, FormatError> {
        if !self.src[self.pos..].starts_with("offset:") {
            return Ok(0.0);
        }
        self.pos += "offset:".len();
        self.skip_whitespace();

        let start = self.pos;
        self.bump_if('-');
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let offset = self.src[start..self.pos]
            .parse::<i64>()
            .map_err(|_| self.error("offset must be an integer"))?;
        self.skip_whitespace();
        Ok(offset as f64)
    }

    /// Arms up to and including the closing `}` of the argument
    fn arms(&mut self, depth: usize, parent: Parent) -> Result<Vec<Arm>, FormatError> {
        let mut arms: Vec<Arm> = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                None => return Err(self.error("unterminated argument: missing '}'")),
                _ => {}
            }

            let selector_start = self.pos;
            let token = self.identifier();
            let selector = if let Some(number) = token.strip_prefix('=') {
                if parent != Parent::Plural {
                    return Err(
                        self.error("exact '=N' selectors are only valid in plural arguments")
                    );
                }
                let value = number.parse::<f64>().map_err(|_| FormatError::Syntax {
                    offset: selector_start,
                    message: format!("invalid exact selector '{token}'"),
                })?;
                Selector::Exact(value)
            } else if token.is_empty() {
                return Err(self.error("expected selector"));
            } else {
                Selector::Keyword(token.to_string())
            };

            if arms.iter().any(|arm| arm.selector == selector) {
                return Err(FormatError::Syntax {
                    offset: selector_start,
                    message: format!("duplicate selector '{token}'"),
                });
            }

            self.skip_whitespace();
            if self.peek() != Some('{') {
                return Err(self.error(format!("expected '{{' after selector '{token}'")));
            }
            self.bump();
            let message = self.message(depth + 1, parent)?;
            self.expect('}')?;

            arms.push(Arm { selector, message });
        }

        if arms.is_empty() {
            return Err(self.error("expected at least one arm"));
        }
        let has_other = arms
            .iter()
            .any(|arm| matches!(&arm.selector, Selector::Keyword(k) if k == "other"));
        if !has_other {
            return Err(self.error("missing 'other' arm"));
        }
        Ok(arms)
    }
}

fn flush(literal: &mut String, elements: &mut Message) {
    if !literal.is_empty() {
        elements.push(Element::Literal(std::mem::take(literal)));
    }
}
