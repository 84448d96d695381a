//! Markup scanning with nested include expansion.
//!
//! The [`Scanner`] turns an artifact into a flat stream of
//! [`TextBlock`](loom_source::TextBlock)s. Included files are scanned in place;
//! the [`ParserStack`] rejects an include that is already being parsed, and the
//! [`TagStack`] checks that server tags are closed in the order they were opened.

#![warn(missing_docs)]

pub mod error;
pub mod lexer;
pub mod parser_stack;
pub mod scanner;
pub mod tag_stack;

pub use error::ParseError;
pub use lexer::Lexer;
pub use parser_stack::{FrameName, ParserStack};
pub use scanner::{ScanOutput, Scanner, SourceLoader};
pub use tag_stack::TagStack;
