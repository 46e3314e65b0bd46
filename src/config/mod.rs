//! Taskfile parsing and resolution
//!
//! Source text goes through the lexer and the document builder, then the
//! resolver expands every value into a [`Config`] which is validated
//! before any task runs.

pub mod document;
pub mod lexer;
pub mod parse;
pub mod resolve;
pub mod schema;
pub mod token;
pub mod types;
pub mod value;

// Re-export main types
pub use document::*;
pub use lexer::*;
pub use parse::*;
pub use resolve::*;
pub use schema::*;
pub use token::*;
pub use types::*;
pub use value::*;
