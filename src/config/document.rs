//! Taskfile document builder
//!
//! Turns the token stream into a [`Document`]: global properties in
//! declaration order plus named sections. Values stay unexpanded here.
//!
//! ```text
//! # global properties
//! cc = gcc
//! level ?= 3
//!
//! [build] clean
//! shell = echo building with ${cc}
//! cmd = ${cc} -O$(echo 2) -o main main.c
//! ```

use crate::config::lexer::Lexer;
use crate::config::token::{Token, TokenKind};
use crate::config::value::{build_value, Value};
use crate::error::{ParseResult, SyntaxError, SyntaxErrorKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Section key holding child task references.
pub const CHILD_KEY: &str = "child";
/// Section key holding scripts run through the shell.
pub const SHELL_KEY: &str = "shell";
/// Section key holding commands executed directly.
pub const COMMAND_KEY: &str = "cmd";

/// A global `key = value` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: Value,
}

/// Key -> values declared inside one section, in declaration order.
pub type SectionBody = BTreeMap<String, Vec<Value>>;

/// Parsed, unresolved Taskfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Global properties; repeated keys are all kept
    pub properties: Vec<Property>,

    /// Sections by name; a redeclared section replaces the earlier one
    pub sections: BTreeMap<String, SectionBody>,
}

impl Document {
    /// All values declared for `key` in `section`.
    pub fn section_values(&self, section: &str, key: &str) -> &[Value] {
        self.sections
            .get(section)
            .and_then(|body| body.get(key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Parse Taskfile source into a [`Document`].
pub fn parse_document(source: &str) -> ParseResult<Document> {
    DocumentBuilder::new(source).build()
}

struct DocumentBuilder<'a> {
    lexer: Lexer<'a>,
    document: Document,
    section: Option<String>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(source: &'a str) -> Self {
        DocumentBuilder {
            lexer: Lexer::new(source),
            document: Document::default(),
            section: None,
        }
    }

    fn build(mut self) -> ParseResult<Document> {
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Comment => self.lexer.skip_line(),
                TokenKind::Illegal => return Err(illegal(&token)),
                TokenKind::Ident if self.lexer.follows(TokenKind::LeftBracket) => {
                    self.section_header(token)?
                }
                TokenKind::Ident => self.property(token)?,
                _ => {}
            }
        }

        Ok(self.document)
    }

    /// `[name] child child ...`
    fn section_header(&mut self, name: Token) -> ParseResult<()> {
        let close = self.lexer.next_token();
        if !close.is(TokenKind::RightBracket) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnclosedSection {
                    name: name.literal,
                    found: close.to_string(),
                },
                close.span,
            ));
        }

        let mut body = SectionBody::new();
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::Ident => body
                    .entry(CHILD_KEY.to_string())
                    .or_default()
                    .push(Value::literal(token.literal)),
                TokenKind::EndOfLine | TokenKind::Eof => break,
                TokenKind::Comment => {
                    self.lexer.skip_line();
                    break;
                }
                TokenKind::Illegal => return Err(illegal(&token)),
                _ => {}
            }
        }

        self.document.sections.insert(name.literal.clone(), body);
        self.section = Some(name.literal);
        Ok(())
    }

    /// `key = value` or `key ?= value`
    fn property(&mut self, key: Token) -> ParseResult<()> {
        let mut assign = self.skip_whitespace();
        let optional = assign.is(TokenKind::Optional);
        if optional {
            assign = self.lexer.next_token();
        }

        if !assign.is(TokenKind::Assign) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::ExpectedAssign {
                    key: key.literal,
                    found: assign.to_string(),
                },
                assign.span,
            ));
        }

        let first = self.skip_whitespace();
        let run = self.value_run(first)?;
        if run.is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::EmptyValue { key: key.literal },
                key.span,
            ));
        }

        let mut value = build_value(&run)?;
        value.optional = optional;

        match &self.section {
            Some(section) => self
                .document
                .sections
                .entry(section.clone())
                .or_default()
                .entry(key.literal)
                .or_default()
                .push(value),
            None => self.document.properties.push(Property {
                key: key.literal,
                value,
            }),
        }

        Ok(())
    }

    fn skip_whitespace(&mut self) -> Token {
        loop {
            let token = self.lexer.next_token();
            if !token.is(TokenKind::Whitespace) {
                return token;
            }
        }
    }

    /// Collect tokens up to the end of the line or an unescaped comment.
    ///
    /// Trailing whitespace is dropped unless it was escaped.
    fn value_run(&mut self, first: Token) -> ParseResult<Vec<Token>> {
        let mut run = Vec::new();
        let mut keep = 0;
        let mut token = first;

        loop {
            match token.kind {
                TokenKind::EndOfLine | TokenKind::Eof => break,
                TokenKind::Comment => {
                    self.lexer.skip_line();
                    break;
                }
                TokenKind::Illegal => return Err(illegal(&token)),
                TokenKind::Escape => {
                    run.push(token);
                    let escaped = self.lexer.next_token();
                    if escaped.kind.ends_line() {
                        break;
                    }
                    if escaped.is(TokenKind::Illegal) {
                        return Err(illegal(&escaped));
                    }
                    run.push(escaped);
                    keep = run.len();
                }
                _ => run.push(token),
            }
            token = self.lexer.next_token();
        }

        while run.len() > keep && run.last().is_some_and(|t| t.is(TokenKind::Whitespace)) {
            run.pop();
        }

        Ok(run)
    }
}

fn illegal(token: &Token) -> SyntaxError {
    let ch = token.literal.chars().next().unwrap_or('\0');
    SyntaxError::new(SyntaxErrorKind::IllegalCharacter(ch), token.span)
}
