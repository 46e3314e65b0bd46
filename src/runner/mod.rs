//! Task execution engine
//!
//! This module handles value expansion, command running and walking the
//! task graph.

pub mod command;
pub mod context;
pub mod expand;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use expand::*;
pub use task::*;
