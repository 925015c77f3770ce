//! Lexical tokens.

use strum::{Display, IntoStaticStr};

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TokenKind {
    /// Text outside `<?php ... ?>`.
    InlineHtml,
    OpenTag,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,
    /// `$name`
    Variable,
    /// Unqualified name, also used for keywords in member position.
    Identifier,
    /// `A\B`
    QualifiedName,
    /// `\A\B`
    FullyQualifiedName,
    /// `namespace\A`
    RelativeName,
    /// A lone `\`.
    NsSeparator,
    /// Single-quoted, double-quoted or backtick string.
    StringLiteral,
    /// `<<<ID` up to and including the line break.
    HeredocStart,
    HeredocBody,
    /// Closing heredoc label, including its indentation.
    HeredocEnd,
    Number,
    Namespace,
    Use,
    Class,
    Interface,
    Trait,
    Enum,
    New,
    Function,
    Return,
    /// `::`
    DoubleColon,
    /// `->` or `?->`
    ObjectOperator,
    /// `=>`
    DoubleArrow,
    /// `#[`
    AttributeOpen,
    /// Any other single character.
    Punct,
}

impl TokenKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment | Self::DocComment)
    }

    /// Keywords introducing a named type.
    pub fn is_declaration(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Trait | Self::Enum)
    }

    /// Tokens that can carry a declared type name.
    pub fn is_type_name(self) -> bool {
        matches!(self, Self::Identifier | Self::QualifiedName)
    }
}

/// A token borrowing its text from the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a token.
    pub fn new(kind: TokenKind, text: &'src str) -> Self {
        Self { kind, text }
    }

    /// Check for a single punctuation character.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes() {
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Identifier.is_trivia());
        assert!(TokenKind::Enum.is_declaration());
        assert!(!TokenKind::New.is_declaration());
        assert!(TokenKind::QualifiedName.is_type_name());
        assert!(!TokenKind::FullyQualifiedName.is_type_name());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TokenKind::QualifiedName.to_string(), "QualifiedName");
        let name: &'static str = TokenKind::Class.into();
        assert_eq!(name, "Class");
    }

    #[test]
    fn test_is_punct() {
        assert!(Token::new(TokenKind::Punct, ";").is_punct(';'));
        assert!(!Token::new(TokenKind::Punct, "{").is_punct(';'));
        assert!(!Token::new(TokenKind::Identifier, ";").is_punct(';'));
    }
}
