//! Error types for macro expansion

use siberian_syntax::Span;
use thiserror::Error;

/// Failure of a single macro application.
///
/// The annotated declaration is left untouched and nothing is generated
/// for the annotation that raised it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MacroError {
    /// The macro was attached to a declaration it cannot handle
    #[error("@{macro_name} is only applicable to {expected}")]
    ShapeMismatch {
        macro_name: &'static str,
        expected: &'static str,
        /// The kind of declaration that was found (`enum`, `func`, ...)
        found: &'static str,
        span: Span,
    },
}

impl MacroError {
    pub fn shape_mismatch(
        macro_name: &'static str,
        expected: &'static str,
        found: &'static str,
        span: Span,
    ) -> Self {
        MacroError::ShapeMismatch {
            macro_name,
            expected,
            found,
            span,
        }
    }

    /// Get the span of this error
    pub fn span(&self) -> Span {
        match self {
            MacroError::ShapeMismatch { span, .. } => *span,
        }
    }

    /// Macro that raised the error; used as the diagnostic domain
    pub fn macro_name(&self) -> &'static str {
        match self {
            MacroError::ShapeMismatch { macro_name, .. } => macro_name,
        }
    }
}
