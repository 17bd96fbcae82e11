//! Reference chain parser.
//!
//! ```text
//! expression := "{{{" chain "}}}"
//! chain      := link ("::" link)*
//! link       := index | field
//! index      := "[" digit+ "]"
//! field      := word ("<" word ">")?
//! word       := (letter | digit | "_")+
//! ```
//!
//! Whitespace around the chain and around each link is ignored.

use serde_json::Value;

use crate::error::ResolveError;
use crate::types::{Chain, Link, ValueExpr, CHAIN_DELIMITER, CLOSE_MARKER, OPEN_MARKER};

/// Parser for the text between the reference markers.
pub struct ChainParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ChainParser<'a> {
    /// Classify and parse a raw patch value.
    pub fn parse_value(raw: &Value) -> Result<ValueExpr, ResolveError> {
        match raw.as_str().and_then(strip_markers) {
            Some(inner) => Ok(ValueExpr::Reference(ChainParser::parse(inner)?)),
            None => Ok(ValueExpr::Literal(raw.clone())),
        }
    }

    /// Parse a chain (markers already removed).
    pub fn parse(input: &'a str) -> Result<Chain, ResolveError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_chain()
    }

    fn parse_chain(&mut self) -> Result<Chain, ResolveError> {
        let mut links = Vec::new();
        loop {
            self.skip_whitespace();
            links.push(self.parse_link()?);
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            if !self.rest().starts_with(CHAIN_DELIMITER) {
                return Err(self.error("expected '::' between links"));
            }
            self.pos += CHAIN_DELIMITER.len();
        }
        Ok(Chain::new(links))
    }

    fn parse_link(&mut self) -> Result<Link, ResolveError> {
        if self.peek() == Some('[') {
            self.advance();
            let digits = self.take_while(|c| c.is_ascii_digit());
            if digits.is_empty() {
                return Err(self.error("expected an index"));
            }
            let index = digits
                .parse()
                .map_err(|_| self.error("index does not fit a sequence position"))?;
            self.expect(']')?;
            return Ok(Link::Index(index));
        }

        let name = self.take_while(is_word_char);
        if name.is_empty() {
            return Err(self.error("expected a field name"));
        }
        let name = name.to_string();
        if self.peek() != Some('<') {
            return Ok(Link::Field { name, component: None });
        }
        self.advance();
        let alias = self.take_while(is_word_char);
        if alias.is_empty() {
            return Err(self.error("expected a component alias"));
        }
        let alias = alias.to_string();
        self.expect('>')?;
        Ok(Link::Field { name, component: Some(alias) })
    }

    // ── Helper methods ────────────────────────────────────────────────────

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }

    fn expect(&mut self, expected: char) -> Result<(), ResolveError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn error(&self, reason: &str) -> ResolveError {
        ResolveError::InvalidExpression(format!(
            "{reason} at position {} in '{}'",
            self.pos, self.input
        ))
    }
}

/// Returns the text between the reference markers, if `s` has both.
pub fn strip_markers(s: &str) -> Option<&str> {
    s.strip_prefix(OPEN_MARKER)?.strip_suffix(CLOSE_MARKER)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
