//! Console rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use loom_source::SourceDb;

/// Formats diagnostics into output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics in a compiler-style terminal format:
///
/// ```text
/// error[P101]: expecting </asp:Panel>
///   --> Default.aspx:3:1
///   = artifact: ~/Default.aspx
///    |
///  3 | <asp:Panel runat="server">
///    | ^
/// ```
pub struct TerminalRenderer {
    /// Whether to wrap the header in ANSI color codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
        if self.color {
            out.push_str(&format!("\x1b[1;31m{header}\x1b[0m\n"));
        } else {
            out.push_str(&header);
            out.push('\n');
        }

        if let Some(location) = &diag.location {
            out.push_str(&format!("  --> {location}\n"));
        }
        if let Some(artifact) = &diag.artifact {
            out.push_str(&format!("   = artifact: {artifact}\n"));
        }

        if let Some(location) = &diag.location {
            if let Some(line) = source_db.line_text(location) {
                let line_num = location.begin_line.to_string();
                let padding = " ".repeat(line_num.len());
                let col_padding = " ".repeat(location.begin_column.saturating_sub(1) as usize);
                out.push_str(&format!("{padding} |\n"));
                out.push_str(&format!("{line_num} | {line}\n"));
                out.push_str(&format!("{padding} | {col_padding}^\n"));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}
