//! Error recovery strategies for the parser.
//!
//! When the parser encounters an error, it uses these strategies to
//! resynchronize and continue parsing to find more errors.

use super::{decl, ParseError, Parser};
use crate::token::{Span, Token};

/// Synchronize to the next declaration boundary.
///
/// Skips whole brace-delimited blocks, stopping at a token that can open a
/// declaration, at the `}` closing the enclosing member block, or after a
/// `;`. Always consumes at least one token when nothing else stops it, so
/// the caller's loop makes progress.
pub fn sync_to_declaration_boundary(parser: &mut Parser) {
    let start = parser.pos;
    let mut depth = 0usize;

    while !parser.at_eof() {
        let progressed = parser.pos > start;
        match parser.current() {
            Token::LeftBrace => depth += 1,
            Token::RightBrace if depth == 0 => {
                if !progressed {
                    parser.advance();
                }
                return;
            }
            Token::RightBrace => depth -= 1,
            Token::Semicolon if depth == 0 => {
                parser.advance();
                return;
            }
            tok if depth == 0 && progressed && tok.starts_declaration() => return,
            Token::Identifier(word)
                if depth == 0
                    && progressed
                    && parser.newline_before()
                    && decl::is_modifier_word(word) =>
            {
                return
            }
            _ => {}
        }
        parser.advance();
    }
}

/// Skip a balanced `open ... close` group starting at the current token.
///
/// Returns the span of the closing token.
pub fn skip_balanced(parser: &mut Parser, open: Token, close: Token) -> Result<Span, ParseError> {
    let open_span = parser.expect(open.clone())?;
    let mut depth = 1usize;

    loop {
        if parser.at_eof() {
            return Err(ParseError::unclosed(open, close, open_span));
        }
        if parser.check(&open) {
            depth += 1;
        } else if parser.check(&close) {
            depth -= 1;
            if depth == 0 {
                let span = parser.current_span();
                parser.advance();
                return Ok(span);
            }
        }
        parser.advance();
    }
}

/// Skip tokens until we find one of the expected tokens.
pub fn skip_until(parser: &mut Parser, expected: &[Token]) {
    while !parser.at_eof() && !parser.check_any(expected) {
        parser.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_skips_nested_blocks() {
        let mut parser = Parser::new("garbage { var inner = 1 } func next()").unwrap();
        sync_to_declaration_boundary(&mut parser);
        assert!(matches!(parser.current(), Token::Func));
    }

    #[test]
    fn test_sync_stops_at_enclosing_brace() {
        let mut parser = Parser::new("oops oops } var x").unwrap();
        sync_to_declaration_boundary(&mut parser);
        assert!(matches!(parser.current(), Token::RightBrace));
    }

    #[test]
    fn test_sync_stops_at_modifier_on_new_line() {
        let mut parser = Parser::new("oops\npublic var x: Int").unwrap();
        sync_to_declaration_boundary(&mut parser);
        assert!(parser.check_word("public"));
    }

    #[test]
    fn test_skip_balanced() {
        let mut parser = Parser::new("{ a { b } c } d").unwrap();
        let close = skip_balanced(&mut parser, Token::LeftBrace, Token::RightBrace).unwrap();
        assert_eq!(close.start, 12);
        assert!(parser.check_word("d"));
    }

    #[test]
    fn test_skip_balanced_reports_unclosed() {
        let mut parser = Parser::new("{ a { b }").unwrap();
        let err = skip_balanced(&mut parser, Token::LeftBrace, Token::RightBrace).unwrap_err();
        assert!(err.message.starts_with("Unclosed '{'"));
    }
}
