//! Class map table parser.
//!
//! Reads back the array literal produced by [`TableWriter`](crate::TableWriter).
//! Accepted shape: an open tag, `return`, `[` or `array(`, zero or more
//! `'key' => 'value'` pairs separated by commas (trailing comma allowed), the
//! closing bracket and `;`. Only single-quoted strings are supported.

use classmap_core::DeclarationMap;
use classmap_scan::{Lexer, Token, TokenKind};

use crate::error::TableError;

/// Parse table source text into a map, keeping the table's entry order.
pub fn parse_table(source: &str) -> Result<DeclarationMap, TableError> {
    let tokens: Vec<Token<'_>> = Lexer::new(source)
        .tokenize()
        .into_iter()
        .filter(|token| !token.kind.is_trivia())
        .collect();
    TableParser { tokens, pos: 0 }.parse()
}

struct TableParser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
}

impl<'src> TableParser<'src> {
    fn parse(mut self) -> Result<DeclarationMap, TableError> {
        if self.at(TokenKind::InlineHtml) && self.tokens[self.pos].text.trim().is_empty() {
            self.pos += 1;
        }
        self.expect(TokenKind::OpenTag, "`<?php`")?;
        self.expect(TokenKind::Return, "`return`")?;

        let close = if self.eat_punct('[') {
            ']'
        } else if self.at_word("array") {
            self.pos += 1;
            if !self.eat_punct('(') {
                return Err(self.unexpected("`(` after `array`"));
            }
            ')'
        } else {
            return Err(self.unexpected("`[` or `array(`"));
        };

        let mut map = DeclarationMap::new();
        loop {
            if self.eat_punct(close) {
                break;
            }
            let name = self.string("a class name")?;
            self.expect(TokenKind::DoubleArrow, "`=>`")?;
            let path = self.string("a file path")?;
            map.insert(name, path);

            if !self.eat_punct(',') {
                if self.eat_punct(close) {
                    break;
                }
                return Err(self.unexpected(&format!("`,` or `{close}`")));
            }
        }

        if !self.eat_punct(';') {
            return Err(self.unexpected("`;`"));
        }
        if self.at(TokenKind::CloseTag) {
            self.pos += 1;
        }
        if self.at(TokenKind::InlineHtml) && self.tokens[self.pos].text.trim().is_empty() {
            self.pos += 1;
        }
        if self.pos < self.tokens.len() {
            return Err(self.unexpected("end of table"));
        }
        Ok(map)
    }

    fn current(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|token| token.kind == kind)
    }

    fn at_word(&self, word: &str) -> bool {
        self.current().is_some_and(|token| {
            token.kind == TokenKind::Identifier && token.text.eq_ignore_ascii_case(word)
        })
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.current().is_some_and(|token| token.is_punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), TableError> {
        if self.at(kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn string(&mut self, what: &str) -> Result<String, TableError> {
        let Some(token) = self.current().filter(|t| t.kind == TokenKind::StringLiteral) else {
            return Err(self.unexpected(what));
        };
        let value = unquote_single(token.text)?;
        self.pos += 1;
        Ok(value)
    }

    fn unexpected(&self, what: &str) -> TableError {
        let found = match self.current() {
            Some(token) => format!("{} {:?}", token.kind, token.text),
            None => "end of input".to_string(),
        };
        TableError::malformed(format!(
            "expected {what}, found {found} (token {})",
            self.pos
        ))
    }
}

/// Decode a PHP single-quoted literal: `\\` and `\'` are escapes, every
/// other backslash is literal.
pub fn unquote_single(literal: &str) -> Result<String, TableError> {
    let inner = literal
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| {
            TableError::malformed(format!(
                "only single-quoted strings are supported, found {literal}"
            ))
        })?;

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next @ ('\\' | '\'')) = chars.peek() {
                value.push(next);
                chars.next();
                continue;
            }
        }
        value.push(c);
    }
    Ok(value)
}
