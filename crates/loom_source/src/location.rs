//! Human-readable source positions attached to scanned fragments and errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position range within a named file.
///
/// All line and column values are 1-indexed. A location is an immutable value:
/// the scanner creates a fresh one for every fragment it produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The file the range belongs to.
    pub filename: String,
    /// The starting line number.
    pub begin_line: u32,
    /// The starting column number.
    pub begin_column: u32,
    /// The ending line number.
    pub end_line: u32,
    /// The ending column number.
    pub end_column: u32,
}

impl Location {
    /// Creates a location spanning `(begin_line, begin_column)` to `(end_line, end_column)`.
    pub fn new(
        filename: impl Into<String>,
        begin: (u32, u32),
        end: (u32, u32),
    ) -> Self {
        Self {
            filename: filename.into(),
            begin_line: begin.0,
            begin_column: begin.1,
            end_line: end.0,
            end_column: end.1,
        }
    }

    /// Creates a location pointing at the start of a file.
    pub fn start_of(filename: impl Into<String>) -> Self {
        Self::new(filename, (1, 1), (1, 1))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename, self.begin_line, self.begin_column
        )
    }
}
