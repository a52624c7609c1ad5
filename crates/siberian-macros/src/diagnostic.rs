//! Diagnostic infrastructure for error reporting
//!
//! Macros report through [`Diagnostic`], a plain value carrying a severity,
//! a message, a `domain.id` identifier and the span it points at. Rendering
//! goes through codespan-reporting, either as terminal output or as JSON.

use crate::error::MacroError;
use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::WriteColor;
use serde::{Deserialize, Serialize};
use siberian_syntax::Span;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    fn to_codespan(self) -> codespan_reporting::diagnostic::Severity {
        use codespan_reporting::diagnostic::Severity as Cs;
        match self {
            Severity::Note => Cs::Note,
            Severity::Warning => Cs::Warning,
            Severity::Error => Cs::Error,
        }
    }
}

/// `domain` is the macro (or `Syntax`), `id` names the condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticId {
    pub domain: String,
    pub id: String,
}

impl DiagnosticId {
    pub fn new(domain: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.id)
    }
}

/// A message attached to a source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub id: DiagnosticId,
    pub span: Span,
    /// Label shown under the primary span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, id: DiagnosticId, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            id,
            span,
            label: None,
            notes: Vec::new(),
        }
    }

    /// Create an error diagnostic
    pub fn error(id: DiagnosticId, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, id, message, span)
    }

    /// Create a warning diagnostic
    pub fn warning(id: DiagnosticId, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, id, message, span)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Create diagnostic from a MacroError
    pub fn from_macro_error(error: &MacroError) -> Self {
        match error {
            MacroError::ShapeMismatch { found, span, .. } => Diagnostic::error(
                DiagnosticId::new(error.macro_name(), "invalidInputType"),
                error.to_string(),
                *span,
            )
            .with_label(format!("attached to {} declaration", article(found))),
        }
    }

    /// Build the codespan diagnostic for the given file
    pub fn to_codespan(&self, file_id: usize) -> CsDiagnostic<usize> {
        let mut label = Label::primary(file_id, self.span.start..self.span.end);
        if let Some(message) = &self.label {
            label = label.with_message(message.clone());
        }
        CsDiagnostic::new(self.severity.to_codespan())
            .with_message(self.message.clone())
            .with_code(self.id.to_string())
            .with_labels(vec![label])
            .with_notes(self.notes.clone())
    }

    /// Render to a terminal writer
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
        file_id: usize,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.to_codespan(file_id))
    }

    /// Convert to JSON representation for editor integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>, file_id: usize) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files, file_id))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}[{}] at {}:{}: {}",
            severity, self.id, self.span.line, self.span.column, self.message
        )
    }
}

fn article(word: &str) -> String {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {}", word),
        _ => format!("a {}", word),
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// `domain.id`
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File path
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>, file_id: usize) -> Self {
        let inner = diag.to_codespan(file_id);
        let labels = inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: (!label.message.is_empty()).then(|| label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.id.to_string(),
            severity: diag.severity,
            message: diag.message.clone(),
            labels,
            notes: diag.notes.clone(),
        }
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
