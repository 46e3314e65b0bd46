//! Configuration validation
//!
//! The task graph has an edge from every section to each of its children.
//! It must be acyclic before anything runs.

use crate::config::types::{Config, Sections};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Validate a resolved configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(cycle) = find_cycle(&config.sections) {
        return Err(ConfigError::CircularDependency(cycle.join(" -> ")));
    }
    Ok(())
}

/// Returns true if any chain of child references leads back to itself.
pub fn has_cycle(sections: &Sections) -> bool {
    find_cycle(sections).is_some()
}

/// Find one cycle in the task graph.
///
/// The returned path starts and ends with the same task name. Children
/// that name undeclared sections are treated as leaves.
pub fn find_cycle(sections: &Sections) -> Option<Vec<String>> {
    let mut walk = CycleWalk::new(sections);
    for name in sections.keys() {
        if walk.visit(name) {
            return Some(walk.stack);
        }
    }
    None
}

/// Depth-first traversal state.
///
/// `visited` holds tasks proven cycle-free; `stack` is the current branch,
/// mirrored in `on_stack` for constant-time lookups.
struct CycleWalk<'a> {
    sections: &'a Sections,
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    stack: Vec<String>,
}

impl<'a> CycleWalk<'a> {
    fn new(sections: &'a Sections) -> Self {
        CycleWalk {
            sections,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            stack: Vec::new(),
        }
    }

    /// Returns true if a cycle is reachable from `name`.
    ///
    /// On success `stack` holds the cycle path.
    fn visit(&mut self, name: &'a str) -> bool {
        if self.on_stack.contains(name) {
            let start = self.stack.iter().position(|n| n == name).unwrap_or(0);
            self.stack.drain(..start);
            self.stack.push(name.to_string());
            return true;
        }
        if self.visited.contains(name) {
            return false;
        }

        self.visited.insert(name);
        self.on_stack.insert(name);
        self.stack.push(name.to_string());

        let sections = self.sections;
        if let Some(section) = sections.get(name) {
            for child in &section.child {
                if self.visit(child) {
                    return true;
                }
            }
        }

        self.on_stack.remove(name);
        self.stack.pop();
        false
    }
}
