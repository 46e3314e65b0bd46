//! Property values and their literal construction
//!
//! A value keeps its literal text with every placeholder removed, and
//! remembers where each placeholder belongs as a byte offset into that
//! text. Expansion happens later, once the property table is known.

use crate::config::token::{Token, TokenKind};
use crate::error::{ParseResult, SyntaxError, SyntaxErrorKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// A parsed, unexpanded value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Value {
    /// Literal text with placeholders stripped
    pub string: String,

    /// Declared with `?=`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    /// Insertion offset -> variable names, in source order
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<usize, Vec<String>>,

    /// Insertion offset -> verbatim shell commands, in source order
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub shell: BTreeMap<usize, Vec<String>>,
}

impl Value {
    /// A value with no placeholders.
    pub fn literal(s: impl Into<String>) -> Self {
        Value {
            string: s.into(),
            ..Value::default()
        }
    }

    /// Record a variable reference at `offset`.
    pub fn with_variable(mut self, offset: usize, name: impl Into<String>) -> Self {
        self.variables.entry(offset).or_default().push(name.into());
        self
    }

    /// Record a shell substitution at `offset`.
    pub fn with_shell(mut self, offset: usize, command: impl Into<String>) -> Self {
        self.shell.entry(offset).or_default().push(command.into());
        self
    }

    /// Returns true if expansion would leave the literal untouched.
    pub fn is_plain(&self) -> bool {
        self.variables.is_empty() && self.shell.is_empty()
    }
}

/// Build a [`Value`] from the token run that follows an assignment.
///
/// Escapes take the next token's text verbatim. `${name}` records a
/// variable reference and `$(...)` records a shell substitution; the first
/// `)` closes the substitution, so a literal `)` inside it must be
/// escaped. Any other `$` is kept as text.
pub fn build_value(tokens: &[Token]) -> ParseResult<Value> {
    let mut value = Value::default();
    let mut buf = String::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        match token.kind {
            TokenKind::Escape => {
                let escaped = tokens
                    .get(i + 1)
                    .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::DanglingEscape, token.span))?;
                buf.push_str(&escaped.literal);
                i += 2;
            }
            TokenKind::Variable => match tokens.get(i + 1).map(|t| t.kind) {
                Some(TokenKind::LeftBrace) => {
                    let name = read_variable(tokens, i)?;
                    value.variables.entry(buf.len()).or_default().push(name);
                    i += 4;
                }
                Some(TokenKind::LeftParen) => {
                    let (command, end) = read_shell(tokens, i)?;
                    value.shell.entry(buf.len()).or_default().push(command);
                    i = end + 1;
                }
                _ => {
                    buf.push_str(&token.literal);
                    i += 1;
                }
            },
            _ => {
                buf.push_str(&token.literal);
                i += 1;
            }
        }
    }

    value.string = buf;
    Ok(value)
}

/// Read `${ident}` starting at the `$` token at `start`.
fn read_variable(tokens: &[Token], start: usize) -> ParseResult<String> {
    let name = tokens.get(start + 2);
    let close = tokens.get(start + 3);

    match (name, close) {
        (Some(name), Some(close)) if name.is(TokenKind::Ident) && close.is(TokenKind::RightBrace) => {
            Ok(name.literal.clone())
        }
        _ => {
            let text: String = tokens[start..]
                .iter()
                .take(4)
                .map(|t| t.literal.as_str())
                .collect();
            Err(SyntaxError::new(
                SyntaxErrorKind::MalformedVariable(text),
                tokens[start].span,
            ))
        }
    }
}

/// Read `$(...)` starting at the `$` token at `start`.
///
/// Returns the verbatim command text and the index of the closing `)`.
fn read_shell(tokens: &[Token], start: usize) -> ParseResult<(String, usize)> {
    let mut command = String::new();
    let mut i = start + 2;

    while i < tokens.len() {
        let token = &tokens[i];
        match token.kind {
            TokenKind::RightParen => return Ok((command, i)),
            TokenKind::Escape => {
                if let Some(escaped) = tokens.get(i + 1) {
                    command.push_str(&escaped.literal);
                }
                i += 2;
            }
            _ => {
                command.push_str(&token.literal);
                i += 1;
            }
        }
    }

    Err(SyntaxError::new(
        SyntaxErrorKind::UnterminatedShell(command),
        tokens[start].span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lexer::tokenize;

    fn value_of(src: &str) -> ParseResult<Value> {
        let mut tokens = tokenize(src);
        tokens.pop(); // Eof
        build_value(&tokens)
    }

    #[test]
    fn test_plain_literal() {
        let value = value_of("gcc -o main main.c").unwrap();
        assert_eq!(value.string, "gcc -o main main.c");
        assert!(value.is_plain());
    }

    #[test]
    fn test_variable_offset() {
        let value = value_of("${name}-value").unwrap();
        assert_eq!(value.string, "-value");
        assert_eq!(value.variables.get(&0), Some(&vec!["name".to_string()]));
    }

    #[test]
    fn test_offsets_relative_to_stripped_text() {
        let value = value_of("a${x}b$(date)c").unwrap();
        assert_eq!(value.string, "abc");
        assert_eq!(value.variables.get(&1), Some(&vec!["x".to_string()]));
        assert_eq!(value.shell.get(&2), Some(&vec!["date".to_string()]));
    }

    #[test]
    fn test_adjacent_references_share_offset() {
        let value = value_of("${a}${b}").unwrap();
        assert_eq!(value.string, "");
        assert_eq!(
            value.variables.get(&0),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_shell_span_is_verbatim() {
        let value = value_of("$(git rev-parse --short=8 HEAD) done").unwrap();
        assert_eq!(value.string, " done");
        assert_eq!(
            value.shell.get(&0),
            Some(&vec!["git rev-parse --short=8 HEAD".to_string()])
        );
    }

    #[test]
    fn test_shell_span_keeps_structural_characters() {
        let value = value_of("$(echo ${HOME} [x] \\) ok)").unwrap();
        assert_eq!(value.shell.get(&0), Some(&vec!["echo ${HOME} [x] ) ok".to_string()]));
    }

    #[test]
    fn test_first_paren_closes_shell() {
        let value = value_of("$(echo (a) b)").unwrap();
        assert_eq!(value.shell.get(&0), Some(&vec!["echo (a".to_string()]));
        assert_eq!(value.string, " b)");
    }

    #[test]
    fn test_unterminated_shell() {
        let err = value_of("$(echo hi").unwrap_err();
        assert_eq!(
            err.kind,
            SyntaxErrorKind::UnterminatedShell("echo hi".to_string())
        );
    }

    #[test]
    fn test_malformed_variable() {
        let err = value_of("${ name}").unwrap_err();
        assert!(matches!(err.kind, SyntaxErrorKind::MalformedVariable(_)));

        let err = value_of("${name").unwrap_err();
        assert!(matches!(err.kind, SyntaxErrorKind::MalformedVariable(_)));
    }

    #[test]
    fn test_escape_takes_next_token() {
        let value = value_of("\\${name} \\# \\\\").unwrap();
        assert_eq!(value.string, "${name} # \\");
        assert!(value.is_plain());
    }

    #[test]
    fn test_dangling_escape() {
        let err = value_of("abc\\").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::DanglingEscape);
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        let value = value_of("cost $5").unwrap();
        assert_eq!(value.string, "cost $5");
    }
}
