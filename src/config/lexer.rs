//! Taskfile tokenizer
//!
//! The lexer hands out one token per call and remembers the token it
//! returned before, so the document builder can tell a section name
//! (`[name]`) from a property key without buffering lookahead.

use crate::config::token::{Span, Token, TokenKind};

const COMMENT: char = '#';
const ESCAPE: char = '\\';
const OPTIONAL: char = '?';

/// Tokenize a whole source string.
///
/// Comment bodies are skipped the same way the document builder skips
/// them. The returned vector always ends with a single `Eof` token.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    let mut escaped = false;

    loop {
        let token = lexer.next_token();
        let kind = token.kind;
        tokens.push(token);

        match kind {
            TokenKind::Eof => break,
            TokenKind::Comment if !escaped => lexer.skip_line(),
            _ => {}
        }
        escaped = kind == TokenKind::Escape && !escaped;
    }

    tokens
}

/// Cursor over Taskfile source text.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    last: Option<Token>,
    current: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let pos = if input.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };

        Lexer {
            input,
            pos,
            line: 1,
            col: 1,
            last: None,
            current: None,
        }
    }

    /// The token returned before the most recent one.
    pub fn last_token(&self) -> Option<&Token> {
        self.last.as_ref()
    }

    /// The most recently returned token.
    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Returns true if the token before the current one has `kind`.
    pub fn follows(&self, kind: TokenKind) -> bool {
        self.last.as_ref().is_some_and(|t| t.kind == kind)
    }

    /// Advance past the next token and return it.
    pub fn next_token(&mut self) -> Token {
        let span = self.span();

        let token = match self.peek() {
            None => Token::new(TokenKind::Eof, "", span),
            Some(ch) => match ch {
                '=' => self.single(TokenKind::Assign, span),
                '$' => self.single(TokenKind::Variable, span),
                '(' => self.single(TokenKind::LeftParen, span),
                ')' => self.single(TokenKind::RightParen, span),
                '[' => self.single(TokenKind::LeftBracket, span),
                ']' => self.single(TokenKind::RightBracket, span),
                '{' => self.single(TokenKind::LeftBrace, span),
                '}' => self.single(TokenKind::RightBrace, span),
                OPTIONAL => self.single(TokenKind::Optional, span),
                ESCAPE => self.single(TokenKind::Escape, span),
                COMMENT => self.single(TokenKind::Comment, span),
                '\n' => self.single(TokenKind::EndOfLine, span),
                '\r' => {
                    self.advance();
                    if self.peek() == Some('\n') {
                        self.advance();
                        Token::new(TokenKind::EndOfLine, "\r\n", span)
                    } else {
                        Token::new(TokenKind::EndOfLine, "\r", span)
                    }
                }
                ' ' | '\t' => self.read_while(TokenKind::Whitespace, span, is_blank),
                c if is_ident(c) => self.read_while(TokenKind::Ident, span, is_ident),
                c if c.is_control() => self.single(TokenKind::Illegal, span),
                _ => self.read_while(TokenKind::Text, span, is_text),
            },
        };

        self.last = self.current.replace(token.clone());
        token
    }

    /// Move the cursor to the end of the current line.
    ///
    /// The line terminator itself is left in place so the next call to
    /// [`next_token`](Self::next_token) returns it.
    pub fn skip_line(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.advance();
        }
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
            if ch == '\n' || (ch == '\r' && self.peek() != Some('\n')) {
                self.line += 1;
                self.col = 1;
            } else if ch != '\r' {
                self.col += 1;
            }
        }
    }

    fn single(&mut self, kind: TokenKind, span: Span) -> Token {
        let start = self.pos;
        self.advance();
        Token::new(kind, &self.input[start..self.pos], span)
    }

    fn read_while(&mut self, kind: TokenKind, span: Span, accept: fn(char) -> bool) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(accept) {
            self.advance();
        }
        Token::new(kind, &self.input[start..self.pos], span)
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_text(c: char) -> bool {
    !c.is_control()
        && !is_blank(c)
        && !is_ident(c)
        && !matches!(
            c,
            '=' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | OPTIONAL | ESCAPE | COMMENT
        )
}
