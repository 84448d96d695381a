//! Structured build failure reports.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use loom_source::{ArtifactIdentity, Location};
use serde::{Deserialize, Serialize};

/// A structured report about one artifact's build.
///
/// Carries the artifact identity and source location of the problem rather
/// than any internal pipeline state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The artifact whose build reported the problem.
    pub artifact: Option<ArtifactIdentity>,
    /// Where in the source the problem was detected.
    pub location: Option<Location>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            artifact: None,
            location: None,
            notes: Vec::new(),
        }
    }

    /// Attaches the artifact being built.
    pub fn with_artifact(mut self, artifact: ArtifactIdentity) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Attaches a source location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
