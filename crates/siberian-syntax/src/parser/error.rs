//! Parse error types and error reporting

use crate::lexer::LexError;
use crate::token::{Span, Token};
use std::fmt;
use thiserror::Error;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: Vec<Token>, found: Token },

    /// Unexpected end of file
    UnexpectedEof { expected: Vec<Token> },

    /// Invalid syntax
    InvalidSyntax { reason: String },

    /// Missing closing delimiter
    UnclosedDelimiter { open: Token, expected_close: Token },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at {}:{}: {}",
            self.span.line, self.span.column, self.message
        )?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = match expected.as_slice() {
            [] => format!("Unexpected '{}'", found),
            [single] => format!("Expected {}, found '{}'", describe(single), found),
            many => format!("Expected one of {}, found '{}'", quoted_list(many), found),
        };

        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = match expected.as_slice() {
            [] => "Unexpected end of file".to_string(),
            [single] => format!("Unexpected end of file, expected {}", describe(single)),
            many => format!("Unexpected end of file, expected one of {}", quoted_list(many)),
        };

        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            message: format!("Invalid syntax: {}", reason),
            kind: ParseErrorKind::InvalidSyntax { reason },
            span,
            suggestion: None,
        }
    }

    /// Create an "unclosed delimiter" error.
    pub fn unclosed(open: Token, expected_close: Token, span: Span) -> Self {
        Self {
            message: format!("Unclosed '{}', expected '{}'", open, expected_close),
            kind: ParseErrorKind::UnclosedDelimiter {
                open,
                expected_close,
            },
            span,
            suggestion: None,
        }
    }

    /// Add a suggestion to this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// An empty identifier stands for "any identifier" in an expected set.
fn describe(token: &Token) -> String {
    match token {
        Token::Identifier(name) if name.is_empty() => "identifier".to_string(),
        other => format!("'{}'", other),
    }
}

fn quoted_list(tokens: &[Token]) -> String {
    tokens.iter().map(describe).collect::<Vec<_>>().join(", ")
}

/// Everything that can stop a source file from producing a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<LexError>),

    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),
}

impl SyntaxError {
    /// Flatten into `(message, span)` pairs for reporting.
    pub fn messages(&self) -> Vec<(String, Span)> {
        match self {
            SyntaxError::Lex(errors) => errors
                .iter()
                .map(|err| (err.to_string(), err.span()))
                .collect(),
            SyntaxError::Parse(errors) => errors
                .iter()
                .map(|err| (err.message.clone(), err.span))
                .collect(),
        }
    }
}
