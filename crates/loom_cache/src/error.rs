//! Error types for assembly resolution.

/// A single load strategy failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
    /// Why the strategy failed.
    pub message: String,
}

impl LoadError {
    /// Creates a load error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every resolution strategy failed for a name.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No strategy produced an assembly. The name is not cached, so a later
    /// call retries.
    #[error("could not resolve assembly '{name}': {source}")]
    AssemblyResolution {
        /// The name that was requested.
        name: String,
        /// The failure of the last strategy attempted.
        #[source]
        source: LoadError,
    },
}
