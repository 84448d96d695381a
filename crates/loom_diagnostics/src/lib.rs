//! User-facing reporting of failed builds.
//!
//! A failed build is reported as a [`Diagnostic`] naming the artifact and,
//! when known, the source [`Location`](loom_source::Location) of the problem.
//! [`TerminalRenderer`] formats them for the console.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
