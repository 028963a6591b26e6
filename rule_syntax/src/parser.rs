//! Text parser for the rule syntax understood by `set_rules`:
//!
//! ```text
//! path(X, Z) :- edge(X, Y), path(Y, Z)
//! q(X, Y), r(Y) :- p(X)
//! ```
//!
//! A term starting with an uppercase letter or a `?` is a variable, anything
//! else is a constant. Constants may be quoted (`"New York"`) to include
//! whitespace or punctuation.

use crate::{Atom, Rule, Term};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed rule at byte {position}: {message} (in {source_text:?})")]
pub struct RuleParseError {
    pub source_text: String,
    pub position: usize,
    pub message: String,
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> RuleParseError {
        RuleParseError {
            source_text: self.text.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), RuleParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.bump();
            return true;
        }

        false
    }

    fn is_token_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '.' | '<' | '>' | '#' | '/' | '+')
    }

    fn token(&mut self) -> Result<&'a str, RuleParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if Self::is_token_char(c)) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }

        Ok(&self.text[start..self.pos])
    }

    fn quoted(&mut self) -> Result<&'a str, RuleParseError> {
        // Opening quote already consumed by the caller's check.
        self.bump();
        let start = self.pos;
        loop {
            match self.peek() {
                Some('"') => {
                    let end = self.pos;
                    self.bump();
                    return Ok(&self.text[start..end]);
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error("unterminated quoted constant")),
            }
        }
    }

    fn term(&mut self) -> Result<Term, RuleParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('"') => Ok(Term::Constant(self.quoted()?.to_string())),
            Some('?') => {
                self.bump();
                Ok(Term::Variable(self.token()?.to_string()))
            }
            _ => {
                let token = self.token()?;
                let is_variable = token
                    .chars()
                    .next()
                    .map(|c| c.is_uppercase())
                    .unwrap_or(false);
                if is_variable {
                    Ok(Term::Variable(token.to_string()))
                } else {
                    Ok(Term::Constant(token.to_string()))
                }
            }
        }
    }

    fn atom(&mut self) -> Result<Atom, RuleParseError> {
        let symbol = self.token()?.to_string();
        self.expect('(')?;

        let mut terms = vec![self.term()?];
        while self.eat(',') {
            terms.push(self.term()?);
        }
        self.expect(')')?;

        Ok(Atom { terms, symbol })
    }

    fn atom_list(&mut self) -> Result<Vec<Atom>, RuleParseError> {
        let mut atoms = vec![self.atom()?];
        while self.eat(',') {
            atoms.push(self.atom()?);
        }

        Ok(atoms)
    }

    fn implication(&mut self) -> Result<(), RuleParseError> {
        self.skip_whitespace();
        if self.text[self.pos..].starts_with(":-") {
            self.pos += 2;
            return Ok(());
        }

        Err(self.error("expected ':-' between head and body"))
    }

    fn end(&mut self) -> Result<(), RuleParseError> {
        self.skip_whitespace();
        // A trailing period is tolerated, as in conventional rule files.
        if self.eat('.') {
            self.skip_whitespace();
        }
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected trailing '{}'", c))),
        }
    }
}

/// Parses one rule of the form `head1(..)[, head2(..)] :- body1(..), ...`.
pub fn parse_rule(text: &str) -> Result<Rule, RuleParseError> {
    let mut cursor = Cursor::new(text);
    let heads = cursor.atom_list()?;
    cursor.implication()?;
    let body = cursor.atom_list()?;
    cursor.end()?;

    Ok(Rule { heads, body })
}

/// Parses a single atom such as `path(?X, 3)`, used for query entry points.
pub fn parse_atom(text: &str) -> Result<Atom, RuleParseError> {
    let mut cursor = Cursor::new(text);
    let atom = cursor.atom()?;
    cursor.end()?;

    Ok(atom)
}
