//! Diagnostic codes grouped by the pipeline stage that reports them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage a diagnostic originates from, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Scanning and include expansion, prefixed with `P`.
    Parse,
    /// Code generation and compilation, prefixed with `B`.
    Build,
    /// Configuration problems, prefixed with `C`.
    Config,
    /// Resource classification and generation, prefixed with `R`.
    Resource,
    /// Bugs in loom itself, prefixed with `I`.
    Internal,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Parse => 'P',
            Category::Build => 'B',
            Category::Config => 'C',
            Category::Resource => 'R',
            Category::Internal => 'I',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `P101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Open/close tag mismatch or otherwise malformed markup.
pub const STRUCTURAL_PARSE: DiagnosticCode = DiagnosticCode::new(Category::Parse, 101);
/// An artifact includes itself, directly or transitively.
pub const INCLUDE_CYCLE: DiagnosticCode = DiagnosticCode::new(Category::Parse, 102);
/// An included file could not be found.
pub const INCLUDE_NOT_FOUND: DiagnosticCode = DiagnosticCode::new(Category::Parse, 103);
/// No provider is mapped to the artifact's extension.
pub const NO_PROVIDER: DiagnosticCode = DiagnosticCode::new(Category::Build, 201);
/// An auxiliary schema or contract document is malformed.
pub const MALFORMED_DOCUMENT: DiagnosticCode = DiagnosticCode::new(Category::Build, 202);
/// The compiler backend rejected a batch.
pub const COMPILATION_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Build, 203);
/// An external assembly reference could not be resolved.
pub const ASSEMBLY_RESOLUTION: DiagnosticCode = DiagnosticCode::new(Category::Build, 204);
/// No compiler backend is registered for a language.
pub const MISSING_COMPILER: DiagnosticCode = DiagnosticCode::new(Category::Config, 301);
/// A resource file name does not yield a valid identifier.
pub const INVALID_RESOURCE_NAME: DiagnosticCode = DiagnosticCode::new(Category::Resource, 401);
/// An internal invariant was violated.
pub const INTERNAL: DiagnosticCode = DiagnosticCode::new(Category::Internal, 901);
