//! Expression capture
//!
//! Expressions appear in initializers, default arguments, enum raw values
//! and attribute arguments. None of them is evaluated, so the parser only
//! finds where an expression ends and keeps its text. Single-token literals
//! and names are structured so generators can inspect them.

use super::{ParseError, Parser};
use crate::ast::Expr;
use crate::token::Token;

/// Where an expression is being read, which decides what ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    /// `var x = <expr>`: a line break or a trailing observer block ends it
    Initializer,

    /// `f(x: Int = <expr>)`, `@Attr(<expr>)`: only `,` and `)` end it
    Argument,
}

/// Capture one expression starting at the current token.
pub fn capture_expression(parser: &mut Parser, context: ExprContext) -> Result<Expr, ParseError> {
    let start = parser.current_span();
    let mut depth = 0usize;
    let mut consumed = 0usize;

    loop {
        if parser.at_eof() {
            break;
        }
        if depth == 0 && consumed > 0 && ends_expression(parser, context) {
            break;
        }
        match parser.current() {
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
            Token::RightParen | Token::RightBracket | Token::RightBrace => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Token::Comma | Token::Semicolon if depth == 0 => break,
            _ => {}
        }
        parser.advance();
        consumed += 1;
    }

    if consumed == 0 {
        return Err(parser
            .unexpected_token(&[])
            .with_suggestion("expected an expression"));
    }

    if consumed == 1 {
        if let Some(expr) = simple_expression(parser.previous_token()) {
            return Ok(expr);
        }
    }

    let end = parser.previous_span();
    Ok(Expr::Verbatim(parser.text(start.start, end.end).trim().to_string()))
}

/// Boundary checks that only apply at depth zero after the first token.
fn ends_expression(parser: &Parser, context: ExprContext) -> bool {
    if context == ExprContext::Argument {
        return false;
    }

    // `var x = 1 { didSet { ... } }`
    if parser.check(&Token::LeftBrace)
        && matches!(
            parser.peek().and_then(Token::as_identifier),
            Some("willSet" | "didSet")
        )
    {
        return true;
    }

    // A new line ends the initializer unless it continues the expression.
    parser.newline_before() && !continues_expression(parser.current())
}

/// A token that, first on its line, carries the previous line on.
pub fn continues_expression(token: &Token) -> bool {
    matches!(
        token,
        Token::Dot | Token::Operator(_) | Token::Question | Token::Arrow | Token::Amp
    )
}

fn simple_expression(token: &Token) -> Option<Expr> {
    match token {
        Token::IntLiteral(text) | Token::FloatLiteral(text) => Some(Expr::NumberLiteral(text.clone())),
        Token::StringLiteral(value) => Some(Expr::StringLiteral(value.clone())),
        Token::True => Some(Expr::BoolLiteral(true)),
        Token::False => Some(Expr::BoolLiteral(false)),
        Token::Nil => Some(Expr::Nil),
        Token::Identifier(name) => Some(Expr::Identifier(name.clone())),
        _ => None,
    }
}
