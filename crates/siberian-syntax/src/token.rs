//! Token definitions for the declaration subset.
//!
//! Declaration keywords get dedicated variants. Contextual words such as
//! `get`, `set`, `async`, `static` or `actor` stay identifiers and are
//! recognized by the parser in position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token of the declaration language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Declaration keywords
    Import,
    Protocol,
    Struct,
    Class,
    Enum,
    Extension,
    Var,
    Let,
    Func,
    Init,
    Deinit,
    Subscript,
    Case,
    Typealias,
    Associatedtype,

    // Other keywords that matter inside signatures
    Throws,
    Rethrows,
    Inout,
    Where,
    Return,
    If,
    Else,
    In,

    // Literals
    IntLiteral(String),
    FloatLiteral(String),
    StringLiteral(String),
    True,
    False,
    Nil,

    // Identifiers (plain, backticked and `$0`-style)
    Identifier(String),
    Underscore,

    // Punctuation
    At,
    Hash,
    Backslash,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    DotDotDot,
    Arrow,
    Equal,
    Question,
    Bang,
    Less,
    Greater,
    Amp,

    /// Any other operator spelling (`==`, `+=`, `&&`, ...)
    Operator(String),

    // Special
    Eof,
}

/// Source location information for a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Span covering both `self` and `other`; line/column come from the earlier one.
    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Import => write!(f, "import"),
            Token::Protocol => write!(f, "protocol"),
            Token::Struct => write!(f, "struct"),
            Token::Class => write!(f, "class"),
            Token::Enum => write!(f, "enum"),
            Token::Extension => write!(f, "extension"),
            Token::Var => write!(f, "var"),
            Token::Let => write!(f, "let"),
            Token::Func => write!(f, "func"),
            Token::Init => write!(f, "init"),
            Token::Deinit => write!(f, "deinit"),
            Token::Subscript => write!(f, "subscript"),
            Token::Case => write!(f, "case"),
            Token::Typealias => write!(f, "typealias"),
            Token::Associatedtype => write!(f, "associatedtype"),
            Token::Throws => write!(f, "throws"),
            Token::Rethrows => write!(f, "rethrows"),
            Token::Inout => write!(f, "inout"),
            Token::Where => write!(f, "where"),
            Token::Return => write!(f, "return"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::In => write!(f, "in"),
            Token::IntLiteral(text) | Token::FloatLiteral(text) => write!(f, "{}", text),
            Token::StringLiteral(_) => write!(f, "\"<string>\""),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Nil => write!(f, "nil"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Underscore => write!(f, "_"),
            Token::At => write!(f, "@"),
            Token::Hash => write!(f, "#"),
            Token::Backslash => write!(f, "\\"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Dot => write!(f, "."),
            Token::DotDotDot => write!(f, "..."),
            Token::Arrow => write!(f, "->"),
            Token::Equal => write!(f, "="),
            Token::Question => write!(f, "?"),
            Token::Bang => write!(f, "!"),
            Token::Less => write!(f, "<"),
            Token::Greater => write!(f, ">"),
            Token::Amp => write!(f, "&"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

impl Token {
    /// Returns true if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Import
                | Token::Protocol
                | Token::Struct
                | Token::Class
                | Token::Enum
                | Token::Extension
                | Token::Var
                | Token::Let
                | Token::Func
                | Token::Init
                | Token::Deinit
                | Token::Subscript
                | Token::Case
                | Token::Typealias
                | Token::Associatedtype
                | Token::Throws
                | Token::Rethrows
                | Token::Inout
                | Token::Where
                | Token::Return
                | Token::If
                | Token::Else
                | Token::In
                | Token::True
                | Token::False
                | Token::Nil
        )
    }

    /// Returns true if this token can open a declaration.
    pub fn starts_declaration(&self) -> bool {
        matches!(
            self,
            Token::At
                | Token::Hash
                | Token::Import
                | Token::Protocol
                | Token::Struct
                | Token::Class
                | Token::Enum
                | Token::Extension
                | Token::Var
                | Token::Let
                | Token::Func
                | Token::Init
                | Token::Deinit
                | Token::Subscript
                | Token::Case
                | Token::Typealias
                | Token::Associatedtype
        )
    }

    /// The identifier text, if this is an identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Token::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Text usable as an argument label or member name.
    ///
    /// Swift accepts most keywords as labels (`func index(for key: K)`), so
    /// keywords map to their spelling here.
    pub fn label_text(&self) -> Option<String> {
        match self {
            Token::Identifier(name) => Some(name.clone()),
            Token::Underscore => Some("_".to_string()),
            tok if tok.is_keyword() => Some(tok.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge_keeps_earliest_position() {
        let a = Span::new(10, 14, 2, 5);
        let b = Span::new(2, 6, 1, 3);
        let merged = a.merge(&b);
        assert_eq!(merged.start, 2);
        assert_eq!(merged.end, 14);
        assert_eq!((merged.line, merged.column), (1, 3));
    }

    #[test]
    fn test_keywords_are_valid_labels() {
        assert_eq!(Token::In.label_text().as_deref(), Some("in"));
        assert_eq!(Token::Underscore.label_text().as_deref(), Some("_"));
        assert_eq!(Token::Comma.label_text(), None);
    }
}
