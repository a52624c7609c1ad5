//! Type annotation parsing

use super::decl::parse_thrown_type;
use super::{recovery, ParseError, Parser};
use crate::ast::{FunctionType, TupleTypeElement, TypeSyntax};
use crate::token::Token;

/// Ownership specifiers that may precede a parameter type.
const SPECIFIERS: &[&str] = &["borrowing", "consuming", "__owned", "__shared", "sending"];

/// Parse a type annotation.
///
/// ```text
/// type        := attributes? composition
/// composition := postfix ('&' postfix)*
/// postfix     := primary ('?' | '!' | '.' IDENT)*
/// ```
pub fn parse_type(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    let mut specifier = None;
    let mut attributes = Vec::new();

    loop {
        if parser.check(&Token::Inout) {
            parser.advance();
            specifier = Some("inout".to_string());
        } else if let Some(word) = parser
            .current()
            .as_identifier()
            .filter(|word| SPECIFIERS.contains(word))
        {
            let word = word.to_string();
            parser.advance();
            specifier = Some(word);
        } else if parser.check(&Token::At) {
            attributes.push(parse_type_attribute(parser)?);
        } else {
            break;
        }
    }

    let base = parse_composition(parser)?;

    if specifier.is_none() && attributes.is_empty() {
        Ok(base)
    } else {
        Ok(TypeSyntax::Attributed {
            specifier,
            attributes,
            base: Box::new(base),
        })
    }
}

/// `@escaping`, `@Sendable`, `@convention(c)`, kept as written.
fn parse_type_attribute(parser: &mut Parser) -> Result<String, ParseError> {
    let start = parser.expect(Token::At)?;
    parser.expect_identifier()?;
    if parser.check(&Token::LeftParen) && parser.adjacent_to_previous() {
        recovery::skip_balanced(parser, Token::LeftParen, Token::RightParen)?;
    }
    let end = parser.previous_span();
    Ok(parser.text(start.start, end.end).to_string())
}

fn parse_composition(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    let first = parse_postfix(parser)?;
    if !parser.check(&Token::Amp) {
        return Ok(first);
    }

    let mut parts = vec![first];
    while parser.eat(&Token::Amp) {
        parts.push(parse_postfix(parser)?);
    }
    Ok(TypeSyntax::Composition(parts))
}

fn parse_postfix(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    let mut ty = parse_primary(parser)?;

    loop {
        match parser.current() {
            Token::Question if parser.adjacent_to_previous() => {
                parser.advance();
                ty = TypeSyntax::optional(ty);
            }
            Token::Bang if parser.adjacent_to_previous() => {
                parser.advance();
                ty = TypeSyntax::implicitly_unwrapped(ty);
            }
            // `Foo<Int>.Nested`, `Foo.Type`, `P.Protocol`
            Token::Dot if matches!(parser.peek(), Some(Token::Identifier(_))) => {
                parser.advance();
                let member = parser.expect_identifier()?;
                ty = TypeSyntax::named(format!("{}.{}", ty, member));
            }
            _ => return Ok(ty),
        }
    }
}

fn parse_primary(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    match parser.current().clone() {
        Token::Identifier(word)
            if (word == "some" || word == "any") && starts_type(parser.peek()) =>
        {
            parser.advance();
            let base = parse_postfix(parser)?;
            Ok(TypeSyntax::Existential {
                keyword: word,
                base: Box::new(base),
            })
        }
        Token::Identifier(_) => parse_named(parser),
        Token::LeftBracket => parse_collection(parser),
        Token::LeftParen => parse_parenthesized(parser),
        _ => Err(parser
            .unexpected_token(&[Token::Identifier(String::new()), Token::LeftParen, Token::LeftBracket])
            .with_suggestion("expected a type")),
    }
}

fn starts_type(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(Token::Identifier(_) | Token::LeftParen | Token::LeftBracket)
    )
}

/// `Swift.Result<Value, Error>`
fn parse_named(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    let mut name = parser.expect_identifier()?;

    while parser.check(&Token::Dot) && matches!(parser.peek(), Some(Token::Identifier(_))) {
        parser.advance();
        name.push('.');
        name.push_str(&parser.expect_identifier()?);
    }

    let mut generic_args = Vec::new();
    if parser.check(&Token::Less) {
        parser.advance();
        loop {
            generic_args.push(parse_type(parser)?);
            if !parser.eat(&Token::Comma) {
                break;
            }
        }
        parser.expect(Token::Greater)?;
    }

    Ok(TypeSyntax::Named { name, generic_args })
}

/// `[Element]` or `[Key: Value]`
fn parse_collection(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    parser.expect(Token::LeftBracket)?;
    let element = parse_type(parser)?;

    let ty = if parser.eat(&Token::Colon) {
        let value = parse_type(parser)?;
        TypeSyntax::Dictionary {
            key: Box::new(element),
            value: Box::new(value),
        }
    } else {
        TypeSyntax::array(element)
    };

    parser.expect(Token::RightBracket)?;
    Ok(ty)
}

/// Tuples, parenthesized types and function types.
fn parse_parenthesized(parser: &mut Parser) -> Result<TypeSyntax, ParseError> {
    parser.expect(Token::LeftParen)?;

    let mut elements = Vec::new();
    while !parser.check(&Token::RightParen) {
        let label = parse_element_label(parser);
        let mut ty = parse_type(parser)?;
        if parser.eat(&Token::DotDotDot) {
            // Variadic closure parameter; the element type stands in for it.
            ty = TypeSyntax::array(ty);
        }
        elements.push(TupleTypeElement { label, ty });
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RightParen)?;

    let mut is_async = false;
    let mut is_throwing = false;
    let mut thrown_type = None;
    loop {
        if parser.eat_word("async") {
            is_async = true;
        } else if parser.check_any(&[Token::Throws, Token::Rethrows]) {
            parser.advance();
            is_throwing = true;
            thrown_type = parse_thrown_type(parser)?.map(Box::new);
        } else {
            break;
        }
    }

    if parser.eat(&Token::Arrow) {
        let return_type = parse_type(parser)?;
        return Ok(TypeSyntax::Function(FunctionType {
            params: elements.into_iter().map(|element| element.ty).collect(),
            is_async,
            is_throwing,
            thrown_type,
            return_type: Box::new(return_type),
        }));
    }

    if is_async || is_throwing {
        return Err(parser.unexpected_token(&[Token::Arrow]));
    }

    if elements.len() == 1 && elements[0].label.is_none() {
        if let Some(element) = elements.pop() {
            return Ok(element.ty);
        }
    }
    Ok(TypeSyntax::Tuple(elements))
}

/// `label:` or `_ name:` in front of a tuple or closure element.
fn parse_element_label(parser: &mut Parser) -> Option<String> {
    let first = parser.current().label_text()?;
    match parser.peek() {
        Some(Token::Colon) => {
            parser.advance();
            parser.advance();
            Some(first)
        }
        Some(next) if next.label_text().is_some() && matches!(parser.peek_nth(2), Some(Token::Colon)) => {
            parser.advance();
            let second = parser.current().label_text();
            parser.advance();
            parser.advance();
            second
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(source: &str) -> TypeSyntax {
        let mut parser = Parser::new(source).unwrap();
        let ty = parse_type(&mut parser).unwrap();
        assert!(parser.at_eof(), "trailing input in {:?}", source);
        ty
    }

    #[test]
    fn test_round_trip_spellings() {
        for source in [
            "Int",
            "Int?",
            "String!",
            "[Int]",
            "[String: [Int]]",
            "Swift.Result<Data, Error>",
            "Array<Array<Int>>",
            "(a: Int, b: String)",
            "()",
            "(Int, String) async throws -> Bool",
            "(Data) throws(DecodingError) -> Model",
            "((Int) -> Void)?",
            "any Service & Sendable",
            "some Collection",
            "@escaping () -> Void",
            "inout [Int]",
            "Foo.Type",
        ] {
            assert_eq!(ty(source).to_string(), source);
        }
    }

    #[test]
    fn test_parenthesized_type_collapses() {
        assert_eq!(ty("(Int)"), TypeSyntax::named("Int"));
    }

    #[test]
    fn test_optionality() {
        assert!(ty("Int?").is_optional());
        assert!(ty("Int!").is_optional());
        assert!(!ty("[Int?]").is_optional());
        assert!(ty("@escaping (() -> Void)?").is_optional());
    }

    #[test]
    fn test_inout_specifier() {
        let parsed = ty("inout Int");
        assert!(parsed.is_inout());
        assert_eq!(parsed.without_attributes().to_string(), "Int");
    }

    #[test]
    fn test_closure_parameter_names_are_dropped() {
        assert_eq!(ty("(_ value: Int) -> Void").to_string(), "(Int) -> Void");
    }

    #[test]
    fn test_typed_throws_keeps_error_type() {
        match ty("() async throws(NetworkError) -> Void") {
            TypeSyntax::Function(function) => {
                assert!(function.is_throwing);
                assert_eq!(function.thrown_type.as_deref(), Some(&TypeSyntax::named("NetworkError")));
            }
            other => panic!("expected a function type, found {:?}", other),
        }
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let mut parser = Parser::new("= 3").unwrap();
        assert!(parse_type(&mut parser).is_err());
    }
}
