//! Terminal output
//!
//! Every diagnostic goes to stderr as `<label>: <message>` so the
//! standard output of tasks stays untouched.

use crate::error::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt::Display;

/// Kind of line being printed, which decides the label colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Progress,
    Warning,
    Error,
    Debug,
}

fn paint(label: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Progress => label.green(),
        Tone::Warning => label.yellow(),
        Tone::Error => label.red().bold(),
        Tone::Debug => label.dimmed(),
    }
}

/// Print `<label>: <message>` to stderr.
pub fn print(tone: Tone, label: &str, message: impl Display) {
    eprintln!("{}: {}", paint(label, tone), message);
}

/// Render a value as YAML under a label.
pub fn render_dump<T: Serialize>(label: &str, value: &T) -> Result<String> {
    let yaml = serde_yaml::to_string(value)?;
    Ok(format!("{}:\n{}", paint(label, Tone::Debug), yaml.trim_end()))
}

/// Print a value as YAML under a label.
pub fn dump<T: Serialize>(label: &str, value: &T) -> Result<()> {
    eprintln!("{}", render_dump(label, value)?);
    Ok(())
}

/// Render an argv vector the way it is logged before running.
pub fn quote_argv(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| format!("{arg:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}
