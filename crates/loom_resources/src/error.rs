//! Errors raised while processing resource files.

use loom_parser::ParseError;

/// A resource file could not be turned into code.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The file name does not yield valid namespace and class identifiers.
    #[error("invalid resource file name '{path}'")]
    InvalidResourceName {
        /// The offending resource file.
        path: String,
    },

    /// A `.resx` document could not be read.
    #[error("malformed resource document '{path}'")]
    Malformed {
        /// The offending resource file.
        path: String,
        /// The underlying markup error.
        #[source]
        source: ParseError,
    },

    /// The resource directory could not be listed.
    #[error("cannot read resource directory '{path}'")]
    Io {
        /// The directory being listed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
