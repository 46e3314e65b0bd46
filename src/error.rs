//! Error types for rcall

use crate::config::Span;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rcall operations
pub type Result<T> = std::result::Result<T, RcallError>;

/// Main error type for rcall
#[derive(Error, Debug)]
pub enum RcallError {
    /// Taskfile syntax errors
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// YAML dump errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Classifies a Taskfile syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Byte that cannot appear anywhere in a Taskfile.
    IllegalCharacter(char),
    /// Section header not closed by `]`.
    UnclosedSection { name: String, found: String },
    /// Property key not followed by `=` (or `?=`).
    ExpectedAssign { key: String, found: String },
    /// Property with nothing after the assignment.
    EmptyValue { key: String },
    /// `${` not followed by `identifier}`.
    MalformedVariable(String),
    /// `$(` never closed by `)`.
    UnterminatedShell(String),
    /// `\` with nothing left to escape.
    DanglingEscape,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalCharacter(ch) => write!(f, "illegal character {ch:?}"),
            Self::UnclosedSection { name, found } => {
                write!(f, "section '{name}' expects ']', found {found:?}")
            }
            Self::ExpectedAssign { key, found } => {
                write!(f, "property '{key}' expects '=', found {found:?}")
            }
            Self::EmptyValue { key } => write!(f, "property '{key}' has no value"),
            Self::MalformedVariable(text) => {
                write!(f, "malformed variable reference {text:?}")
            }
            Self::UnterminatedShell(text) => {
                write!(f, "unterminated shell substitution $({text}")
            }
            Self::DanglingEscape => write!(f, "escape character at end of value"),
        }
    }
}

/// Error produced while building a document from Taskfile source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {}, column {}", .span.line, .span.column)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find Taskfile (searched: {0})")]
    NotFound(String),

    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },

    #[error("Task '{0}' is not defined")]
    TaskNotFound(String),

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Command {command:?} failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Cannot split command {0:?}: unbalanced quotes")]
    InvalidCommand(String),

    #[error("No command found to run")]
    EmptyCommand,
}

/// Non-fatal problems met while expanding values.
///
/// The placeholder that produced a warning contributes no text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    #[error("Variable ${{{0}}} is not defined")]
    UndefinedVariable(String),

    #[error("Shell $({command}) failed: {reason}")]
    ShellFailed { command: String, reason: String },
}

impl ResolveWarning {
    /// Shell failures are only worth showing in verbose mode.
    pub fn is_debug(&self) -> bool {
        matches!(self, ResolveWarning::ShellFailed { .. })
    }
}

/// Specialized result type for Taskfile parsing
pub type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
