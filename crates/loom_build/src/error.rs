//! Build failures and their user-facing diagnostics.

use loom_cache::ResolveError;
use loom_common::InternalError;
use loom_diagnostics::{code, Diagnostic};
use loom_parser::ParseError;
use loom_resources::ResourceError;
use loom_source::ArtifactIdentity;

/// Why a build failed.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No compiler backend is registered for a language.
    #[error("no compiler is registered for language '{language}'")]
    Configuration {
        /// The language that has no backend.
        language: String,
    },

    /// An artifact's markup is malformed.
    #[error("{artifact}: {source}")]
    Parse {
        /// The artifact being built.
        artifact: ArtifactIdentity,
        /// The scanner failure.
        #[source]
        source: ParseError,
    },

    /// An artifact includes itself, directly or indirectly.
    #[error("{artifact}: {source}")]
    Cycle {
        /// The artifact being built.
        artifact: ArtifactIdentity,
        /// The rejected include, always [`ParseError::Cycle`].
        #[source]
        source: ParseError,
    },

    /// An external assembly referenced by generated code cannot be found.
    #[error(transparent)]
    AssemblyResolution(#[from] ResolveError),

    /// An auxiliary description document is malformed. Fails the whole batch.
    #[error("{artifact}: malformed document: {reason}")]
    MalformedDocument {
        /// The artifact whose document is malformed.
        artifact: ArtifactIdentity,
        /// What is wrong with it.
        reason: String,
    },

    /// The compiler backend rejected a batch.
    #[error("compilation of '{group}' failed: {message}")]
    Compilation {
        /// The synthetic assembly name of the batch.
        group: String,
        /// The backend's failure message.
        message: String,
    },

    /// No provider kind is configured for the artifact's extension.
    #[error("{artifact}: no build provider is registered for this file type")]
    NoProvider {
        /// The artifact without a provider.
        artifact: ArtifactIdentity,
    },

    /// A resource file cannot be turned into code.
    #[error("{artifact}: {source}")]
    Resource {
        /// The resource artifact.
        artifact: ArtifactIdentity,
        /// The resource failure.
        #[source]
        source: ResourceError,
    },

    /// A pipeline invariant was violated.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl BuildError {
    /// Wraps a scanner failure for `artifact`, singling out include cycles.
    pub fn from_parse(artifact: &ArtifactIdentity, source: ParseError) -> Self {
        let artifact = artifact.clone();
        if source.is_cycle() {
            BuildError::Cycle { artifact, source }
        } else {
            BuildError::Parse { artifact, source }
        }
    }

    /// The artifact the failure belongs to, when it belongs to one.
    pub fn artifact(&self) -> Option<&ArtifactIdentity> {
        match self {
            BuildError::Parse { artifact, .. }
            | BuildError::Cycle { artifact, .. }
            | BuildError::MalformedDocument { artifact, .. }
            | BuildError::NoProvider { artifact }
            | BuildError::Resource { artifact, .. } => Some(artifact),
            BuildError::Configuration { .. }
            | BuildError::AssemblyResolution(_)
            | BuildError::Compilation { .. }
            | BuildError::Internal(_) => None,
        }
    }

    /// Converts the failure into a diagnostic naming the artifact and
    /// location, when known.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match self {
            BuildError::Configuration { language } => {
                Diagnostic::error(code::MISSING_COMPILER, self.to_string()).with_note(format!(
                    "add a [[compilers]] entry for '{language}' to loom.toml"
                ))
            }
            BuildError::Parse { source, .. } => {
                let code = match source {
                    ParseError::IncludeNotFound { .. } => code::INCLUDE_NOT_FOUND,
                    _ => code::STRUCTURAL_PARSE,
                };
                Diagnostic::error(code, source.to_string()).with_location(source.location().clone())
            }
            BuildError::Cycle { source, .. } => {
                Diagnostic::error(code::INCLUDE_CYCLE, source.to_string())
                    .with_location(source.location().clone())
            }
            BuildError::AssemblyResolution(err) => {
                let diag = Diagnostic::error(code::ASSEMBLY_RESOLUTION, err.to_string());
                match err {
                    ResolveError::AssemblyResolution { .. } => {
                        diag.with_note("check [assemblies].probe_paths in loom.toml")
                    }
                }
            }
            BuildError::MalformedDocument { reason, .. } => {
                Diagnostic::error(code::MALFORMED_DOCUMENT, reason.clone())
            }
            BuildError::Compilation { .. } => {
                Diagnostic::error(code::COMPILATION_FAILED, self.to_string())
            }
            BuildError::NoProvider { artifact } => Diagnostic::error(
                code::NO_PROVIDER,
                "no build provider is registered for this file type",
            )
            .with_note(format!(
                "map '{}' in [build_providers]",
                artifact.extension().unwrap_or("(no extension)")
            )),
            BuildError::Resource { source, .. } => {
                Diagnostic::error(code::INVALID_RESOURCE_NAME, source.to_string())
            }
            BuildError::Internal(err) => Diagnostic::error(code::INTERNAL, err.to_string()),
        };
        match self.artifact() {
            Some(artifact) => diag.with_artifact(artifact.clone()),
            None => diag,
        }
    }
}

impl From<&BuildError> for Diagnostic {
    fn from(err: &BuildError) -> Self {
        err.to_diagnostic()
    }
}
