//! rcall - a tiny make(1)-like task runner
//!
//! A `Taskfile` declares global properties and task sections. Values may
//! reference properties with `${name}` and capture command output with
//! `$(command)`. Running a task runs its children first.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{RcallError, Result};

/// Current version of rcall
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
