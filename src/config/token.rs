//! Taskfile tokens

use serde::Serialize;
use std::fmt;

/// Source location for error reporting (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Span { line: 1, column: 1 }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Run of letters, digits, `_` and `-`.
    Ident,
    /// `=`
    Assign,
    /// `?`, marks an optional property when placed before `=`.
    Optional,
    /// `$`
    Variable,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `\`
    Escape,
    /// Run of spaces and tabs.
    Whitespace,
    /// `\n`, `\r` or `\r\n`.
    EndOfLine,
    /// `#`. The rest of the line is skipped by the caller.
    Comment,
    /// Run of any other printable characters.
    Text,
    /// Control character that cannot appear in a Taskfile.
    Illegal,
    /// End of input, returned repeatedly.
    Eof,
}

impl TokenKind {
    /// Returns true for tokens that end a logical line.
    pub fn ends_line(self) -> bool {
        matches!(self, TokenKind::EndOfLine | TokenKind::Eof)
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            literal: literal.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::EndOfLine => write!(f, "end of line"),
            _ => write!(f, "{}", self.literal),
        }
    }
}
