//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `loom.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A `[build_providers]` entry names a provider kind that does not exist.
    #[error("unknown provider kind '{kind}' for extension '{extension}'")]
    UnknownProviderKind {
        /// The extension the entry was declared for.
        extension: String,
        /// The unrecognized kind name.
        kind: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("compilation.default_language".to_string());
        assert_eq!(
            format!("{err}"),
            "missing required field: compilation.default_language"
        );
    }

    #[test]
    fn display_unknown_kind() {
        let err = ConfigError::UnknownProviderKind {
            extension: ".foo".to_string(),
            kind: "widget".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "unknown provider kind 'widget' for extension '.foo'"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
