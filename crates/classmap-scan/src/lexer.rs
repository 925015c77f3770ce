//! PHP source lexer.
//!
//! Produces a best-effort token stream covering the whole input. Lexing never
//! fails: unterminated strings and comments run to the end of the input and
//! unknown characters become [`TokenKind::Punct`].

use crate::heredoc::{self, is_ident_continue, is_ident_start};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Php,
}

/// Single-pass lexer over a source string.
pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    mode: Mode,
    /// Kind of the last non-trivia token, used for keyword context.
    last_significant: Option<TokenKind>,
    tokens: Vec<Token<'src>>,
}

impl<'src> Lexer<'src> {
    /// Create a lexer starting in inline HTML mode, as PHP does.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            mode: Mode::Html,
            last_significant: None,
            tokens: Vec::new(),
        }
    }

    /// Create a lexer that starts directly in PHP mode (no `<?php` needed).
    pub fn new_in_code(source: &'src str) -> Self {
        Self {
            mode: Mode::Php,
            ..Self::new(source)
        }
    }

    /// Lex the whole input.
    pub fn tokenize(mut self) -> Vec<Token<'src>> {
        while self.pos < self.bytes.len() {
            match self.mode {
                Mode::Html => self.inline_html(),
                Mode::Php => self.code(),
            }
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        if !kind.is_trivia() {
            self.last_significant = Some(kind);
        }
        self.tokens.push(Token::new(kind, &self.source[start..end]));
        self.pos = end;
    }

    fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn rest(&self) -> &'src [u8] {
        &self.bytes[self.pos..]
    }

    fn inline_html(&mut self) {
        let start = self.pos;
        let mut scan = start;
        while let Some(offset) = self.source[scan..].find("<?") {
            let tag = scan + offset;
            if let Some(tag_len) = open_tag_len(&self.bytes[tag..]) {
                if tag > start {
                    self.push(TokenKind::InlineHtml, start, tag);
                }
                self.push(TokenKind::OpenTag, tag, tag + tag_len);
                self.mode = Mode::Php;
                return;
            }
            scan = tag + 2;
        }
        self.push(TokenKind::InlineHtml, start, self.bytes.len());
    }

    fn code(&mut self) {
        let start = self.pos;
        let b = self.bytes[start];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                let end = self.scan_while(start, |b| b.is_ascii_whitespace() || b == 0x0b);
                self.push(TokenKind::Whitespace, start, end);
            }
            b'?' if self.byte(1) == Some(b'>') => {
                let mut end = start + 2;
                match self.bytes.get(end) {
                    Some(b'\n') => end += 1,
                    Some(b'\r') if self.bytes.get(end + 1) == Some(&b'\n') => end += 2,
                    _ => {}
                }
                self.push(TokenKind::CloseTag, start, end);
                self.mode = Mode::Html;
            }
            b'?' if self.rest().starts_with(b"?->") => {
                self.push(TokenKind::ObjectOperator, start, start + 3);
            }
            b'#' if self.byte(1) == Some(b'[') => {
                self.push(TokenKind::AttributeOpen, start, start + 2);
            }
            b'#' => self.line_comment(start),
            b'/' if self.byte(1) == Some(b'/') => self.line_comment(start),
            b'/' if self.byte(1) == Some(b'*') => self.block_comment(start),
            b'$' if self.byte(1).is_some_and(is_ident_start) => {
                let end = self.scan_while(start + 1, is_ident_continue);
                self.push(TokenKind::Variable, start, end);
            }
            b'\'' | b'"' | b'`' => self.string(start, b),
            b'<' if self.rest().starts_with(b"<<<") => self.heredoc(start),
            b'0'..=b'9' => {
                let end = self.scan_while(start, |b| {
                    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
                });
                self.push(TokenKind::Number, start, end);
            }
            b'\\' if self.byte(1).is_some_and(is_ident_start) => {
                let end = self.scan_name_segments(start);
                self.push(TokenKind::FullyQualifiedName, start, end);
            }
            b'\\' => self.push(TokenKind::NsSeparator, start, start + 1),
            b':' if self.byte(1) == Some(b':') => {
                self.push(TokenKind::DoubleColon, start, start + 2);
            }
            b'-' if self.byte(1) == Some(b'>') => {
                self.push(TokenKind::ObjectOperator, start, start + 2);
            }
            b'=' if self.byte(1) == Some(b'>') => {
                self.push(TokenKind::DoubleArrow, start, start + 2);
            }
            b if is_ident_start(b) => self.name(start),
            _ => self.push(TokenKind::Punct, start, start + 1),
        }
    }

    fn scan_while(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let mut end = from;
        while self.bytes.get(end).is_some_and(|&b| pred(b)) {
            end += 1;
        }
        end
    }

    /// Consume `\segment` repetitions starting at `from`.
    fn scan_name_segments(&self, mut from: usize) -> usize {
        while self.bytes.get(from) == Some(&b'\\')
            && self.bytes.get(from + 1).is_some_and(|&b| is_ident_start(b))
        {
            from = self.scan_while(from + 1, is_ident_continue);
        }
        from
    }

    fn line_comment(&mut self, start: usize) {
        let mut end = start;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'\n' => break,
                b'?' if self.bytes.get(end + 1) == Some(&b'>') => break,
                _ => end += 1,
            }
        }
        self.push(TokenKind::Comment, start, end);
    }

    fn block_comment(&mut self, start: usize) {
        let is_doc = self.rest().starts_with(b"/**")
            && self.byte(3).is_some_and(|b| b.is_ascii_whitespace());
        let end = self.source[start + 2..]
            .find("*/")
            .map_or(self.bytes.len(), |offset| start + 2 + offset + 2);
        let kind = if is_doc {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        self.push(kind, start, end);
    }

    fn string(&mut self, start: usize, quote: u8) {
        let mut end = start + 1;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'\\' => end += 2,
                b if b == quote => {
                    end += 1;
                    break;
                }
                _ => end += 1,
            }
        }
        self.push(TokenKind::StringLiteral, start, end.min(self.bytes.len()));
    }

    fn heredoc(&mut self, start: usize) {
        let Some(header) = heredoc::parse_header(self.bytes, start) else {
            self.push(TokenKind::Punct, start, start + 1);
            return;
        };
        self.push(TokenKind::HeredocStart, start, header.end);

        let label = &self.source[header.label.clone()];
        match heredoc::find_closing(self.source, header.end, label) {
            Some(closing) => {
                if closing.line_start > header.end {
                    self.push(TokenKind::HeredocBody, header.end, closing.line_start);
                }
                self.push(TokenKind::HeredocEnd, closing.line_start, closing.end);
            }
            None => {
                if header.end < self.bytes.len() {
                    self.push(TokenKind::HeredocBody, header.end, self.bytes.len());
                }
            }
        }
    }

    fn name(&mut self, start: usize) {
        let word_end = self.scan_while(start, is_ident_continue);
        let end = self.scan_name_segments(word_end);
        let word = &self.source[start..word_end];

        if end > word_end {
            let kind = if word.eq_ignore_ascii_case("namespace") {
                TokenKind::RelativeName
            } else {
                TokenKind::QualifiedName
            };
            self.push(kind, start, end);
            return;
        }

        let kind = self.keyword(word, word_end);
        self.push(kind, start, word_end);
    }

    /// Keyword kind for `word`, or `Identifier` when the word is used as a
    /// member or function name.
    fn keyword(&self, word: &str, word_end: usize) -> TokenKind {
        if matches!(
            self.last_significant,
            Some(TokenKind::DoubleColon | TokenKind::ObjectOperator | TokenKind::Function)
        ) {
            return TokenKind::Identifier;
        }

        let lower = word.to_ascii_lowercase();
        match lower.as_str() {
            "namespace" => TokenKind::Namespace,
            "use" => TokenKind::Use,
            "class" => TokenKind::Class,
            "interface" => TokenKind::Interface,
            "trait" => TokenKind::Trait,
            "enum" if self.enum_follows_name(word_end) => TokenKind::Enum,
            "new" => TokenKind::New,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            _ => TokenKind::Identifier,
        }
    }

    /// `enum` is only a keyword when whitespace and a name follow it, and
    /// that name is not `extends` or `implements` (`class Enum extends ...`).
    fn enum_follows_name(&self, word_end: usize) -> bool {
        let after = self.scan_while(word_end, |b| b.is_ascii_whitespace());
        if after == word_end || !self.bytes.get(after).is_some_and(|&b| is_ident_start(b)) {
            return false;
        }
        let next_end = self.scan_while(after, is_ident_continue);
        let next = &self.source[after..next_end];
        !next.eq_ignore_ascii_case("extends") && !next.eq_ignore_ascii_case("implements")
    }
}

/// Length of the PHP open tag at the start of `bytes`, if any.
fn open_tag_len(bytes: &[u8]) -> Option<usize> {
    if bytes.starts_with(b"<?=") {
        return Some(3);
    }
    if bytes.len() >= 5 && bytes[..5].eq_ignore_ascii_case(b"<?php") {
        return match bytes.get(5) {
            None => Some(5),
            Some(b'\r') if bytes.get(6) == Some(&b'\n') => Some(7),
            Some(b' ' | b'\t' | b'\n' | b'\r') => Some(6),
            _ => None,
        };
    }
    None
}

/// Lex `source` starting in inline HTML mode.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).tokenize()
}
