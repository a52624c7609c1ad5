//! Parser for the declaration subset
//!
//! This module implements a recursive descent parser that transforms
//! a token stream from the lexer into a [`SourceFile`]. Submodules hold the
//! grammar pieces as free functions over [`Parser`].

pub mod decl;
pub mod error;
pub mod expr;
pub mod recovery;
pub mod types;

use crate::ast::*;
use crate::lexer::{LexError, Lexer};
use crate::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind, SyntaxError};

/// Parser state.
///
/// Keeps the source text next to the tokens: newlines are significant at
/// declaration boundaries and user bodies are sliced out verbatim.
pub struct Parser<'a> {
    /// Original input
    source: &'a str,

    /// Pre-tokenized input, always terminated by `Token::Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source code.
    pub fn new(source: &'a str) -> Result<Self, Vec<LexError>> {
        let tokens = Lexer::new(source).tokenize()?;

        Ok(Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
        })
    }

    /// Parse the entire source file.
    ///
    /// Returns the file on success, or all accumulated errors on failure.
    pub fn parse(mut self) -> Result<SourceFile, Vec<ParseError>> {
        let mut decls = Vec::new();

        while !self.at_eof() {
            if self.check(&Token::Semicolon) {
                self.advance();
                continue;
            }
            // Scripts and `main.swift` mix code with declarations
            if decl::starts_statement(&self) {
                decls.push(decl::skip_statement(&mut self));
                continue;
            }
            match decl::parse_decl(&mut self) {
                Ok(decl) => decls.push(decl),
                Err(err) => {
                    self.errors.push(err);
                    recovery::sync_to_declaration_boundary(&mut self);
                }
            }
        }

        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "parse failed");
            return Err(self.errors);
        }

        let span = Span::new(0, self.source.len(), 1, 1);
        Ok(SourceFile::new(decls, span))
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(1)
    }

    /// Peek `n` tokens ahead of the current one.
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            Span::new(0, 0, 1, 1)
        } else {
            self.tokens[self.pos - 1].1
        }
    }

    /// The most recently consumed token.
    pub fn previous_token(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)].0
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Check if the current token matches any of the given kinds.
    pub fn check_any(&self, expected: &[Token]) -> bool {
        expected.iter().any(|tok| self.check(tok))
    }

    /// Check for a contextual keyword such as `get` or `async`.
    pub fn check_word(&self, word: &str) -> bool {
        self.current().as_identifier() == Some(word)
    }

    /// Consume the contextual keyword if present.
    pub fn eat_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// True when a line break separates the current token from the previous one.
    pub fn newline_before(&self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let gap = self.tokens[self.pos - 1].1.end..self.tokens[self.pos].1.start;
        self.source[gap].contains('\n')
    }

    /// True when the current token directly follows the previous one.
    pub fn adjacent_to_previous(&self) -> bool {
        self.pos > 0 && self.tokens[self.pos - 1].1.end == self.tokens[self.pos].1.start
    }

    /// Consume the current token if it matches the expected kind.
    ///
    /// Returns the consumed token's span on match.
    pub fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume an identifier and return its text.
    pub fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.current() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected_token(&[Token::Identifier(String::new())])),
        }
    }

    /// Source text between two byte offsets.
    pub fn text(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }

    /// Combine two spans into a single span.
    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            line: start.line,
            column: start.column,
        }
    }

    /// Span from `start` up to the last consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        self.combine_spans(start, &self.previous_span())
    }
}

/// Parse a whole source file.
pub fn parse(source: &str) -> Result<SourceFile, SyntaxError> {
    let parser = Parser::new(source).map_err(SyntaxError::Lex)?;
    parser.parse().map_err(SyntaxError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let parser = Parser::new("var x: Int").unwrap();
        assert!(matches!(parser.current(), Token::Var));
        assert!(matches!(parser.peek(), Some(Token::Identifier(_))));
    }

    #[test]
    fn test_parser_at_eof() {
        let parser = Parser::new("").unwrap();
        assert!(parser.at_eof());
    }

    #[test]
    fn test_newline_before() {
        let mut parser = Parser::new("var\nx y").unwrap();
        parser.advance();
        assert!(parser.newline_before());
        parser.advance();
        assert!(!parser.newline_before());
    }

    #[test]
    fn test_adjacency() {
        let mut parser = Parser::new("@A(x) @B (y)").unwrap();
        parser.advance();
        parser.advance();
        assert!(parser.adjacent_to_previous());
        for _ in 0..5 {
            parser.advance();
        }
        assert!(parser.check(&Token::LeftParen));
        assert!(!parser.adjacent_to_previous());
    }

    #[test]
    fn test_errors_are_accumulated() {
        let err = parse("struct { }\nvar = 1").unwrap_err();
        match err {
            SyntaxError::Parse(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected parse errors, got {:?}", other),
        }
    }

    #[test]
    fn test_file_level_statements_are_skipped() {
        let source = "import Foundation\nprint(\"hi\")\nif debug {\n    run()\n}\nlet items = 3\nitems\n    .description\nprotocol P {\n}\n";
        let file = parse(source).unwrap();
        let kinds: Vec<_> = file.decls.iter().map(Decl::kind_name).collect();
        assert_eq!(kinds, ["import", "statement", "statement", "let", "statement", "protocol"]);
        assert_eq!(&source[file.decls[2].span().start..file.decls[2].span().end], "if debug {\n    run()\n}");
    }

    #[test]
    fn test_eof_errors_name_the_missing_identifier() {
        for source in ["@", "protocol"] {
            match parse(source) {
                Err(SyntaxError::Parse(errors)) => {
                    assert_eq!(errors[0].message, "Unexpected end of file, expected identifier")
                }
                other => panic!("expected a parse error for {:?}, got {:?}", source, other),
            }
        }
    }
}
