//! Lexer for the declaration subset.
//!
//! This module implements the lexer using the logos library. It converts
//! source code into a stream of tokens with precise source location
//! information. Bodies of functions and accessors are lexed too (the parser
//! needs balanced braces to skip them) but never interpreted.

use crate::token::{Span, Token};
use logos::Logos;
use thiserror::Error;

/// Logos-based token enum for lexing.
///
/// Converted to the public [`Token`] enum after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Whitespace (skip)
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    // Emitted so an unterminated comment can fail; dropped by the lexer
    #[token("/*", lex_block_comment)]
    BlockComment,

    // Keywords (must come before identifiers)
    #[token("import")]
    Import,

    #[token("protocol")]
    Protocol,

    #[token("struct")]
    Struct,

    #[token("class")]
    Class,

    #[token("enum")]
    Enum,

    #[token("extension")]
    Extension,

    #[token("var")]
    Var,

    #[token("let")]
    Let,

    #[token("func")]
    Func,

    #[token("init")]
    Init,

    #[token("deinit")]
    Deinit,

    #[token("subscript")]
    Subscript,

    #[token("case")]
    Case,

    #[token("typealias")]
    Typealias,

    #[token("associatedtype")]
    Associatedtype,

    #[token("throws")]
    Throws,

    #[token("rethrows")]
    Rethrows,

    #[token("inout")]
    Inout,

    #[token("where")]
    Where,

    #[token("return")]
    Return,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("in")]
    In,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("nil")]
    Nil,

    #[token("_", priority = 3)]
    Underscore,

    // Identifiers (must come after keywords)
    #[regex(r"[\p{XID_Start}_][\p{XID_Continue}]*", |lex| lex.slice().to_string())]
    #[regex(r"`[\p{XID_Start}_][\p{XID_Continue}]*`", |lex| lex.slice().to_string())]
    #[regex(r"\$[\p{XID_Continue}]+", |lex| lex.slice().to_string())]
    Identifier(String),

    // Numbers keep their spelling; they are only ever reprinted.
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*", |lex| lex.slice().to_string())]
    #[regex(r"0b[01][01_]*", |lex| lex.slice().to_string())]
    #[regex(r"0o[0-7][0-7_]*", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    // Strings
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[token("\"\"\"", lex_multiline_string)]
    StringLiteral(String),

    // Operators (longer spellings win over their prefixes)
    #[token("->")]
    Arrow,

    #[token("...")]
    DotDotDot,

    #[token("==", |lex| lex.slice().to_string())]
    #[token("!=", |lex| lex.slice().to_string())]
    #[token("===", |lex| lex.slice().to_string())]
    #[token("!==", |lex| lex.slice().to_string())]
    #[token("&&", |lex| lex.slice().to_string())]
    #[token("||", |lex| lex.slice().to_string())]
    #[token("??", |lex| lex.slice().to_string())]
    #[token("+=", |lex| lex.slice().to_string())]
    #[token("-=", |lex| lex.slice().to_string())]
    #[token("*=", |lex| lex.slice().to_string())]
    #[token("/=", |lex| lex.slice().to_string())]
    #[token("%=", |lex| lex.slice().to_string())]
    #[token("..<", |lex| lex.slice().to_string())]
    #[token("+", |lex| lex.slice().to_string())]
    #[token("-", |lex| lex.slice().to_string())]
    #[token("*", |lex| lex.slice().to_string())]
    #[token("/", |lex| lex.slice().to_string())]
    #[token("%", |lex| lex.slice().to_string())]
    #[token("|", |lex| lex.slice().to_string())]
    #[token("^", |lex| lex.slice().to_string())]
    #[token("~", |lex| lex.slice().to_string())]
    Operator(String),

    // Single-character tokens
    #[token("@")]
    At,

    #[token("#")]
    Hash,

    #[token("\\")]
    Backslash,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("=")]
    Equal,

    #[token("?")]
    Question,

    #[token("!")]
    Bang,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("&")]
    Amp,
}

/// Consumes a nested block comment; false when the input ends inside it.
fn lex_block_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    // "/*" is consumed; block comments nest in Swift.
    let remainder = lex.remainder();
    let bytes = remainder.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() && depth > 0 {
        if bytes[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    lex.bump(i);
    depth == 0
}

fn lex_multiline_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let remainder = lex.remainder();
    let end = remainder.find("\"\"\"")?;
    let content = remainder[..end].to_string();
    lex.bump(end + 3);
    Some(content)
}

fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    // Contents stay escaped; literals are only ever reprinted.
    let s = lex.slice();
    Some(s[1..s.len() - 1].to_string())
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that starts no token
    #[error("Unexpected character '{char}' at {}:{}", .span.line, .span.column)]
    UnexpectedCharacter { char: char, span: Span },

    /// A `"""` literal without its closing delimiter
    #[error("Unterminated string at {}:{}", .span.line, .span.column)]
    UnterminatedString { span: Span },

    /// A `/*` comment still open at the end of the input
    #[error("Unterminated block comment at {}:{}", .span.line, .span.column)]
    UnterminatedComment { span: Span },
}

impl LexError {
    /// Location of the offending input.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span } => *span,
        }
    }
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole input. The result always ends with [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let mut logos_lexer = LogosToken::lexer(self.source);
        let mut line = 1u32;
        let mut column = 1u32;
        let mut last_end = 0;

        while let Some(token_result) = logos_lexer.next() {
            let range = logos_lexer.span();

            // Update line and column based on skipped text
            advance_position(&self.source[last_end..range.start], &mut line, &mut column);

            let span = Span::new(range.start, range.end, line, column);

            match token_result {
                Ok(LogosToken::BlockComment) => {}
                Ok(logos_token) => {
                    let token = convert_token(logos_token);
                    self.tokens.push((token, span));
                }
                Err(()) => {
                    let slice = &self.source[range.start..range.end];
                    if slice.starts_with("\"\"\"") {
                        self.errors.push(LexError::UnterminatedString { span });
                    } else if slice.starts_with("/*") {
                        self.errors.push(LexError::UnterminatedComment { span });
                    } else {
                        let char = self.source[range.start..].chars().next().unwrap_or('\0');
                        self.errors.push(LexError::UnexpectedCharacter { char, span });
                    }
                }
            }

            advance_position(&self.source[range.start..range.end], &mut line, &mut column);
            last_end = range.end;
        }

        advance_position(&self.source[last_end..], &mut line, &mut column);
        let eof_span = Span::new(self.source.len(), self.source.len(), line, column);
        self.tokens.push((Token::Eof, eof_span));

        tracing::trace!(tokens = self.tokens.len(), errors = self.errors.len(), "tokenized");

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

fn advance_position(text: &str, line: &mut u32, column: &mut u32) {
    for c in text.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

fn convert_token(logos_token: LogosToken) -> Token {
    match logos_token {
        LogosToken::Import => Token::Import,
        LogosToken::Protocol => Token::Protocol,
        LogosToken::Struct => Token::Struct,
        LogosToken::Class => Token::Class,
        LogosToken::Enum => Token::Enum,
        LogosToken::Extension => Token::Extension,
        LogosToken::Var => Token::Var,
        LogosToken::Let => Token::Let,
        LogosToken::Func => Token::Func,
        LogosToken::Init => Token::Init,
        LogosToken::Deinit => Token::Deinit,
        LogosToken::Subscript => Token::Subscript,
        LogosToken::Case => Token::Case,
        LogosToken::Typealias => Token::Typealias,
        LogosToken::Associatedtype => Token::Associatedtype,
        LogosToken::Throws => Token::Throws,
        LogosToken::Rethrows => Token::Rethrows,
        LogosToken::Inout => Token::Inout,
        LogosToken::Where => Token::Where,
        LogosToken::Return => Token::Return,
        LogosToken::If => Token::If,
        LogosToken::Else => Token::Else,
        LogosToken::In => Token::In,
        LogosToken::True => Token::True,
        LogosToken::False => Token::False,
        LogosToken::Nil => Token::Nil,
        LogosToken::Underscore => Token::Underscore,
        LogosToken::Identifier(name) => Token::Identifier(name),
        LogosToken::IntLiteral(text) => Token::IntLiteral(text),
        LogosToken::FloatLiteral(text) => Token::FloatLiteral(text),
        LogosToken::StringLiteral(value) => Token::StringLiteral(value),
        LogosToken::Arrow => Token::Arrow,
        LogosToken::DotDotDot => Token::DotDotDot,
        LogosToken::Operator(op) => Token::Operator(op),
        LogosToken::At => Token::At,
        LogosToken::Hash => Token::Hash,
        LogosToken::Backslash => Token::Backslash,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::Comma => Token::Comma,
        LogosToken::Colon => Token::Colon,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Dot => Token::Dot,
        LogosToken::Equal => Token::Equal,
        LogosToken::Question => Token::Question,
        LogosToken::Bang => Token::Bang,
        LogosToken::Less => Token::Less,
        LogosToken::Greater => Token::Greater,
        LogosToken::Amp => Token::Amp,
        LogosToken::Whitespace | LogosToken::LineComment | LogosToken::BlockComment => {
            unreachable!("Whitespace and comments should be skipped")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        let tokens = kinds("protocol P { var x: Int { get set } }");
        assert_eq!(tokens[0], Token::Protocol);
        assert_eq!(tokens[1], Token::Identifier("P".into()));
        assert_eq!(tokens[3], Token::Var);
        assert_eq!(tokens[8], Token::Identifier("get".into()));
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }

    #[test]
    fn test_nested_generics_do_not_merge_angles() {
        let tokens = kinds("Array<Array<Int>>");
        assert_eq!(tokens[5], Token::Greater);
        assert_eq!(tokens[6], Token::Greater);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = kinds("/* outer /* inner */ still */ var // trailing\nlet");
        assert_eq!(tokens, vec![Token::Var, Token::Let, Token::Eof]);
    }

    #[test]
    fn test_unterminated_comment_is_reported() {
        let errors = Lexer::new("var x\n/* open /* nested */ still open").tokenize().unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            LexError::UnterminatedComment { span } => assert_eq!((span.line, span.column), (2, 1)),
            other => panic!("expected an unterminated comment, got {:?}", other),
        }
    }

    #[test]
    fn test_unicode_identifiers() {
        let tokens = kinds("var café: Ünïcode, `naïve`: 名前, $0, _x, _");
        assert_eq!(tokens[1], Token::Identifier("café".into()));
        assert_eq!(tokens[3], Token::Identifier("Ünïcode".into()));
        assert_eq!(tokens[5], Token::Identifier("`naïve`".into()));
        assert_eq!(tokens[7], Token::Identifier("名前".into()));
        assert_eq!(tokens[9], Token::Identifier("$0".into()));
        assert_eq!(tokens[11], Token::Identifier("_x".into()));
        assert_eq!(tokens[13], Token::Underscore);
    }

    #[test]
    fn test_string_literal_keeps_escapes() {
        let tokens = kinds(r#""a\"b""#);
        assert_eq!(tokens[0], Token::StringLiteral(r#"a\"b"#.into()));
    }

    #[test]
    fn test_multiline_string() {
        let tokens = kinds("\"\"\"\nhello\n\"\"\" x");
        assert_eq!(tokens[0], Token::StringLiteral("\nhello\n".into()));
        assert_eq!(tokens[1], Token::Identifier("x".into()));
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::new("var\n  x").tokenize().unwrap();
        assert_eq!((tokens[1].1.line, tokens[1].1.column), (2, 3));
    }

    #[test]
    fn test_variadic_and_arrow() {
        let tokens = kinds("(Int...) -> Bool");
        assert_eq!(tokens[2], Token::DotDotDot);
        assert_eq!(tokens[4], Token::Arrow);
    }

    #[test]
    fn test_unexpected_character_is_reported() {
        let errors = Lexer::new("var x = 'a'").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { char: '\'', .. }));
    }
}
