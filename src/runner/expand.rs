//! Value expansion
//!
//! Replays the placeholders recorded while parsing against a property
//! table: `${name}` takes the property value and `$(command)` takes the
//! command's standard output. Failures never abort; they are returned as
//! warnings and the placeholder contributes nothing.

use crate::config::{Properties, Value};
use crate::error::ResolveWarning;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};

/// Result of expanding one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub warnings: Vec<ResolveWarning>,
}

/// Expand a value using the default interpreter in the current directory.
pub fn expand(properties: &Properties, value: &Value) -> Expansion {
    Expander::new(properties).expand(value)
}

/// Expands values against a property table.
pub struct Expander<'a> {
    properties: &'a Properties,
    interpreter: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl<'a> Expander<'a> {
    pub fn new(properties: &'a Properties) -> Self {
        Expander {
            properties,
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            working_dir: None,
        }
    }

    /// Set the interpreter used for `$(...)` (e.g., ["bash", "-c"])
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        if !interpreter.is_empty() {
            self.interpreter = interpreter;
        }
        self
    }

    /// Run `$(...)` commands in `dir`
    pub fn with_working_dir(mut self, dir: Option<&Path>) -> Self {
        self.working_dir = dir.map(Path::to_path_buf);
        self
    }

    pub fn expand(&self, value: &Value) -> Expansion {
        if value.is_plain() {
            return Expansion {
                text: value.string.clone(),
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();
        let mut inserts: BTreeMap<usize, String> = BTreeMap::new();

        for (&offset, names) in &value.variables {
            for name in names {
                match self.properties.get(name) {
                    Some(text) => inserts.entry(offset).or_default().push_str(text),
                    None => warnings.push(ResolveWarning::UndefinedVariable(name.clone())),
                }
            }
        }

        for (&offset, commands) in &value.shell {
            for command in commands {
                match self.capture(command) {
                    Ok(text) => inserts.entry(offset).or_default().push_str(&text),
                    Err(warning) => warnings.push(warning),
                }
            }
        }

        Expansion {
            text: splice(&value.string, &inserts),
            warnings,
        }
    }

    /// Run a substitution command and return its trimmed standard output.
    fn capture(&self, command: &str) -> Result<String, ResolveWarning> {
        let failed = |reason: String| ResolveWarning::ShellFailed {
            command: command.to_string(),
            reason,
        };

        let (program, args) = self
            .interpreter
            .split_first()
            .ok_or_else(|| failed("no interpreter configured".to_string()))?;

        let mut cmd = StdCommand::new(program);
        cmd.args(args)
            .arg(command)
            .envs(self.properties)
            .stdin(Stdio::null());

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => output.status.to_string(),
                msg => format!("{}: {}", output.status, msg),
            };
            return Err(failed(reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim_end().to_string())
    }
}

/// Insert each replacement before the byte at its offset.
///
/// An offset inside a multi-byte character moves back to the start of
/// that character. Offsets equal to the text length append at the end.
/// Offsets past the end are appended separated by a space.
fn splice(text: &str, inserts: &BTreeMap<usize, String>) -> String {
    let extra: usize = inserts.values().map(String::len).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut last = 0;

    for (&offset, insert) in inserts.range(..=text.len()) {
        let offset = floor_char_boundary(text, offset).max(last);
        out.push_str(&text[last..offset]);
        out.push_str(insert);
        last = offset;
    }
    out.push_str(&text[last..]);

    for (_, insert) in inserts.range(text.len() + 1..) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(insert);
    }

    out
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
