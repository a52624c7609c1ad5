//! Per-expansion state handed to every macro

use crate::config::ExpansionConfig;
use crate::diagnostic::{Diagnostic, DiagnosticId};
use siberian_syntax::Span;

/// Read-only settings plus the diagnostics collected so far.
///
/// A context lives for one source file; nothing in it is shared between
/// expansions.
pub struct ExpansionContext<'a> {
    config: &'a ExpansionConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ExpansionContext<'a> {
    pub fn new(config: &'a ExpansionConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a ExpansionConfig {
        self.config
    }

    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(id = %diagnostic.id, message = %diagnostic.message, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    /// Record a warning under `domain.id`.
    pub fn warn(&mut self, domain: &str, id: &str, message: impl Into<String>, span: Span) {
        self.diagnose(Diagnostic::warning(DiagnosticId::new(domain, id), message, span));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    #[test]
    fn test_diagnostics_keep_their_order() {
        let config = ExpansionConfig::default();
        let mut ctx = ExpansionContext::new(&config);
        ctx.warn("AutoMockable", "variadicParameter", "first", Span::default());
        ctx.diagnose(Diagnostic::error(
            DiagnosticId::new("PublicMemberwiseInit", "existingInitializer"),
            "second",
            Span::default(),
        ));

        let diagnostics = ctx.into_diagnostics();
        let summary: Vec<_> = diagnostics.iter().map(|d| (d.severity, d.message.as_str())).collect();
        assert_eq!(summary, [(Severity::Warning, "first"), (Severity::Error, "second")]);
        assert_eq!(diagnostics[0].id.to_string(), "AutoMockable.variadicParameter");
    }
}
