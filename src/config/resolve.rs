//! Document resolution
//!
//! Folds a parsed [`Document`] and caller overrides into a [`Config`].

use crate::config::document::{Document, CHILD_KEY, COMMAND_KEY, SHELL_KEY};
use crate::config::types::{Config, Properties, Section};
use crate::config::value::Value;
use crate::error::ResolveWarning;
use crate::runner::Expander;
use std::path::{Path, PathBuf};

/// Split a `key=value` override on the first `=`.
///
/// Returns `None` for arguments without `=` (task names).
pub fn parse_override(arg: &str) -> Option<(String, String)> {
    arg.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
}

/// A resolved configuration plus every non-fatal problem met on the way.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub config: Config,
    pub warnings: Vec<ResolveWarning>,
}

/// Resolves documents into configurations.
#[derive(Debug, Clone)]
pub struct Resolver {
    interpreter: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            working_dir: None,
        }
    }

    /// Set the interpreter used for `$(...)` substitutions
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Run substitutions in `dir`
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Resolve `document`, seeding the property table with `overrides`.
    ///
    /// Global properties are folded in declaration order, each expanded
    /// against the table built so far. An optional declaration is skipped
    /// when the key is already set, and a value that expands to nothing
    /// leaves the previous value in place. Sections are resolved last,
    /// against the complete table.
    pub fn resolve(&self, document: &Document, overrides: Properties) -> Resolution {
        let mut resolution = Resolution {
            config: Config {
                properties: overrides,
                ..Config::default()
            },
            warnings: Vec::new(),
        };

        for property in &document.properties {
            let properties = &resolution.config.properties;
            if property.value.optional && properties.contains_key(&property.key) {
                continue;
            }

            let text = self.expand(properties, &property.value, &mut resolution.warnings);
            if !text.is_empty() {
                resolution
                    .config
                    .properties
                    .insert(property.key.clone(), text);
            }
        }

        for (name, body) in &document.sections {
            let properties = &resolution.config.properties;
            let mut section = Section::default();

            for (key, values) in body {
                match key.as_str() {
                    CHILD_KEY => section.child.extend(
                        values
                            .iter()
                            .flat_map(|v| v.string.split_whitespace())
                            .map(str::to_string),
                    ),
                    SHELL_KEY => {
                        for value in values {
                            let text = self.expand(properties, value, &mut resolution.warnings);
                            section.shell.push(text);
                        }
                    }
                    COMMAND_KEY => {
                        for value in values {
                            let text = self.expand(properties, value, &mut resolution.warnings);
                            section.command.push(text);
                        }
                    }
                    _ => {}
                }
            }

            resolution.config.sections.insert(name.clone(), section);
        }

        resolution
    }

    fn expand(
        &self,
        properties: &Properties,
        value: &Value,
        warnings: &mut Vec<ResolveWarning>,
    ) -> String {
        let expansion = Expander::new(properties)
            .with_interpreter(self.interpreter.clone())
            .with_working_dir(self.working_dir.as_deref())
            .expand(value);
        warnings.extend(expansion.warnings);
        expansion.text
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve with the default interpreter in the current directory.
pub fn resolve_config(document: &Document, overrides: Properties) -> Resolution {
    Resolver::new().resolve(document, overrides)
}

/// Directory a Taskfile's commands run in.
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_document;

    fn resolve_src(src: &str, overrides: &[&str]) -> Resolution {
        let document = parse_document(src).unwrap();
        let overrides = overrides.iter().filter_map(|a| parse_override(a)).collect();
        resolve_config(&document, overrides)
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("level=5"),
            Some(("level".to_string(), "5".to_string()))
        );
        assert_eq!(
            parse_override("url=a=b"),
            Some(("url".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_override("build"), None);
    }

    #[test]
    fn test_optional_yields_to_override() {
        let r = resolve_src("level ?= 3\n", &["level=5"]);
        assert_eq!(r.config.properties.get("level").unwrap(), "5");
    }

    #[test]
    fn test_optional_used_without_override() {
        let r = resolve_src("level ?= 3\n", &[]);
        assert_eq!(r.config.properties.get("level").unwrap(), "3");
    }

    #[test]
    fn test_plain_declaration_beats_override() {
        let r = resolve_src("level = 3\n", &["level=5"]);
        assert_eq!(r.config.properties.get("level").unwrap(), "3");
    }

    #[test]
    fn test_last_declaration_wins() {
        let r = resolve_src("cc = gcc\ncc = clang\n", &[]);
        assert_eq!(r.config.properties.get("cc").unwrap(), "clang");
    }

    #[test]
    fn test_properties_see_earlier_properties() {
        let r = resolve_src("name = app\nout = build/${name}\n", &[]);
        assert_eq!(r.config.properties.get("out").unwrap(), "build/app");
    }

    #[test]
    fn test_empty_expansion_keeps_previous_value() {
        let r = resolve_src("x = keep\nx = ${missing}\n", &[]);
        assert_eq!(r.config.properties.get("x").unwrap(), "keep");
        assert_eq!(
            r.warnings,
            vec![ResolveWarning::UndefinedVariable("missing".to_string())]
        );
    }

    #[test]
    fn test_sections_resolved() {
        let src = "\
cc = gcc
[build] clean
shell = echo ${cc}
cmd = ${cc} -o main main.c
cmd = strip main
child = fmt lint
[clean]
cmd = rm -f main
";
        let r = resolve_src(src, &[]);
        let build = r.config.section("build").unwrap();
        assert_eq!(build.child, vec!["clean", "fmt", "lint"]);
        assert_eq!(build.shell, vec!["echo gcc"]);
        assert_eq!(build.command, vec!["gcc -o main main.c", "strip main"]);
        assert_eq!(r.config.section("clean").unwrap().command, vec!["rm -f main"]);
    }

    #[test]
    fn test_sections_see_later_properties() {
        let r = resolve_src("[t]\ncmd = echo ${v}\n", &["v=1"]);
        assert_eq!(r.config.section("t").unwrap().command, vec!["echo 1"]);
    }

    #[test]
    fn test_shell_substitution_in_property() {
        let r = resolve_src("rev = $(echo abc)-dirty\n", &[]);
        assert_eq!(r.config.properties.get("rev").unwrap(), "abc-dirty");
    }

    #[test]
    fn test_config_dir() {
        assert_eq!(config_dir(Path::new("Taskfile")), PathBuf::from("."));
        assert_eq!(
            config_dir(Path::new("/srv/app/Taskfile")),
            PathBuf::from("/srv/app")
        );
    }
}
