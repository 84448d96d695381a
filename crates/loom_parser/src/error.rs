//! Errors reported while scanning an artifact.

use loom_source::Location;

/// A scanning failure, always tied to the location where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Malformed markup: a closing tag that does not match the open one, an
    /// unclosed server tag, or a badly formed tag.
    #[error("{location}: {message}")]
    Structural {
        /// Where the problem was detected.
        location: Location,
        /// What was wrong.
        message: String,
    },

    /// A file includes itself, directly or through other includes.
    #[error("{location}: infinite recursion detected including file '{filename}'")]
    Cycle {
        /// The include directive that closed the cycle.
        location: Location,
        /// The file that is already being parsed.
        filename: String,
    },

    /// An included file could not be found.
    #[error("{location}: included file '{filename}' not found")]
    IncludeNotFound {
        /// The include directive.
        location: Location,
        /// The resolved name of the missing file.
        filename: String,
    },

    /// The file ended inside a construct.
    #[error("{location}: expecting '{expected}' and got end of file")]
    UnexpectedEof {
        /// Where the unterminated construct starts.
        location: Location,
        /// The terminator that was never found.
        expected: String,
    },
}

impl ParseError {
    /// Where the error was detected.
    pub fn location(&self) -> &Location {
        match self {
            ParseError::Structural { location, .. }
            | ParseError::Cycle { location, .. }
            | ParseError::IncludeNotFound { location, .. }
            | ParseError::UnexpectedEof { location, .. } => location,
        }
    }

    /// Returns `true` for include cycles.
    pub fn is_cycle(&self) -> bool {
        matches!(self, ParseError::Cycle { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_display() {
        let err = ParseError::Cycle {
            location: Location::new("b.inc", (3, 1), (3, 30)),
            filename: "a.aspx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "b.inc:3:1: infinite recursion detected including file 'a.aspx'"
        );
        assert!(err.is_cycle());
    }

    #[test]
    fn location_accessor() {
        let loc = Location::new("a.aspx", (1, 4), (1, 9));
        let err = ParseError::UnexpectedEof {
            location: loc.clone(),
            expected: "%>".to_string(),
        };
        assert_eq!(err.location(), &loc);
        assert!(!err.is_cycle());
    }
}
