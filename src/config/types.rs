//! Resolved configuration types
//!
//! This is what the runner works from: every property is a flat string and
//! every section lists its children, shell scripts and commands with all
//! interpolation already applied.

use serde::Serialize;
use std::collections::BTreeMap;

/// Property name -> fully expanded value.
pub type Properties = BTreeMap<String, String>;

/// Section name -> resolved section.
pub type Sections = BTreeMap<String, Section>;

/// Top-level resolved configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Global properties, overrides included
    pub properties: Properties,

    /// Tasks defined in the Taskfile
    pub sections: Sections,
}

impl Config {
    /// Look up a section by task name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Names of all declared sections, sorted
    pub fn task_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }
}

/// A resolved task definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Tasks to run before this one, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child: Vec<String>,

    /// Scripts run through the interpreter
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shell: Vec<String>,

    /// Commands split into words and executed directly
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
}

impl Section {
    /// A section that only references children
    pub fn with_children<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Section {
            child: children.into_iter().map(Into::into).collect(),
            ..Section::default()
        }
    }
}
