//! Execution context for task running
//!
//! The context is shared read-only by every unit of work, including the
//! ones fanned out to other threads in parallel mode.

use crate::ui::{self, Tone};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;

/// Execution settings that stay fixed for a whole run
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory commands run in
    pub working_dir: PathBuf,

    /// Interpreter for shell entries (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Launch every entry of a list at once and wait for all of them
    pub parallel: bool,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            parallel: false,
            verbosity: Verbosity::Normal,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        if !interpreter.is_empty() {
            self.interpreter = interpreter;
        }
        self
    }

    /// Enable or disable fan-out of command lists
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Print a progress line (`Task: build`)
    pub fn print_info(&self, label: &str, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            ui::print(Tone::Progress, label, message);
        }
    }

    /// Print warning message
    pub fn print_warning(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            ui::print(Tone::Warning, "Warning", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Quiet {
            ui::print(Tone::Error, "Error", message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, label: &str, message: impl Display) {
        if self.verbosity >= Verbosity::Verbose {
            ui::print(Tone::Debug, label, message);
        }
    }

    /// Print task start message
    pub fn print_task_start(&self, task_name: &str) {
        self.print_info("Task", task_name);
    }

    /// Print task complete message
    pub fn print_task_complete(&self, task_name: &str) {
        self.print_debug("Done", task_name);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
