//! Type declaration scanner.
//!
//! Walks a file's token stream once and records every named `class`,
//! `interface`, `trait` and `enum` under the namespace active at that point.
//! Anonymous classes (`new class { ... }`) are skipped, and heredoc bodies
//! are blanked before lexing so their contents are never seen.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use classmap_core::{DebugLog, DeclarationMap, ScanError, normalize_separators};

use crate::cursor::TokenCursor;
use crate::heredoc;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Decoded source text with heredoc/nowdoc bodies blanked.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
}

impl SourceText {
    /// Decode `bytes` (lossily, invalid UTF-8 is replaced) and neutralize
    /// multi-line string bodies.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let decoded = String::from_utf8_lossy(bytes);
        Self {
            text: heredoc::neutralize(&decoded).into_owned(),
        }
    }

    /// The prepared text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Tokens with whitespace and comments stripped. Lexing starts in inline
    /// HTML mode, so only empty text yields no tokens.
    pub fn tokens(&self) -> Vec<Token<'_>> {
        Lexer::new(&self.text)
            .tokenize()
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect()
    }
}

/// Scans single files for type declarations.
#[derive(Debug, Clone)]
pub struct DeclarationScanner {
    log: Arc<DebugLog>,
}

impl DeclarationScanner {
    /// Create a scanner reporting to `log`.
    pub fn new(log: Arc<DebugLog>) -> Self {
        Self { log }
    }

    /// The debug log this scanner reports to.
    pub fn debug_log(&self) -> &Arc<DebugLog> {
        &self.log
    }

    /// Extract all declarations from the file at `path`.
    ///
    /// Values in the returned map are the canonical, separator-normalized
    /// path of the file. Fails with [`ScanError::FileAccess`] when the file
    /// is missing, not a regular file, or unreadable.
    pub fn extract_declarations(&self, path: &Path) -> Result<DeclarationMap, ScanError> {
        let realpath = path.canonicalize().map_err(|e| ScanError::io(path, e))?;
        if !realpath.is_file() {
            return Err(ScanError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        self.log.push(format!(
            "extract_declarations: Processing file {} (realpath: {})",
            path.display(),
            realpath.display()
        ));

        let bytes = fs::read(&realpath).map_err(|e| ScanError::io(path, e))?;
        Ok(self.scan_source(&bytes, &normalize_separators(&realpath)))
    }

    /// Extract declarations from in-memory source, recording `path` as the
    /// declaring file.
    pub fn scan_source(&self, bytes: &[u8], path: &str) -> DeclarationMap {
        let source = SourceText::from_bytes(bytes);
        declarations_in(&source.tokens(), path)
    }
}

fn is_namespace_part(token: &Token<'_>) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier | TokenKind::QualifiedName | TokenKind::NsSeparator
    )
}

fn ends_namespace_statement(token: &Token<'_>) -> bool {
    token.kind.is_declaration()
        || token.kind == TokenKind::Use
        || token.is_punct(';')
        || token.is_punct('{')
}

/// Position of the `class` keyword of an anonymous class introduced by the
/// `new` at `new_pos`, looking past `readonly` and attribute groups.
pub fn anonymous_class_after(tokens: &[Token<'_>], new_pos: usize) -> Option<usize> {
    let mut pos = new_pos + 1;
    loop {
        let (index, token) = TokenCursor::at(tokens, pos).peek_significant(0)?;
        match token.kind {
            TokenKind::Class => return Some(index),
            TokenKind::AttributeOpen => pos = TokenCursor::at(tokens, index).skip_attribute()?,
            TokenKind::Identifier if token.text.eq_ignore_ascii_case("readonly") => {
                pos = index + 1;
            }
            _ => return None,
        }
    }
}

/// Namespace declared by the `namespace` keyword at `pos`, with a trailing
/// `\` when non-empty.
pub fn namespace_at(tokens: &[Token<'_>], pos: usize) -> String {
    let name = TokenCursor::at(tokens, pos + 1)
        .collect_until(is_namespace_part, ends_namespace_statement);
    if name.is_empty() {
        name
    } else {
        name + "\\"
    }
}

/// Name declared by the declaration keyword at `pos`, unless another
/// declaration keyword comes first.
pub fn declared_name<'src>(tokens: &[Token<'src>], pos: usize) -> Option<&'src str> {
    TokenCursor::at(tokens, pos + 1)
        .find(|t| t.kind.is_type_name(), |t| t.kind.is_declaration())
        .map(|(_, token)| token.text)
}

/// Collect declarations from a token stream.
pub fn declarations_in(tokens: &[Token<'_>], path: &str) -> DeclarationMap {
    let mut found = DeclarationMap::new();
    let mut namespace = String::new();
    let mut skip_pos: Option<usize> = None;

    for (pos, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::New {
            if let Some(class_pos) = anonymous_class_after(tokens, pos) {
                skip_pos = Some(class_pos);
                continue;
            }
        }
        if skip_pos == Some(pos) {
            skip_pos = None;
            continue;
        }

        if token.kind == TokenKind::Namespace {
            namespace = namespace_at(tokens, pos);
            continue;
        }

        if token.kind.is_declaration() {
            if let Some(name) = declared_name(tokens, pos) {
                found.insert(format!("{namespace}{name}"), path.to_string());
            }
        }
    }

    found
}
