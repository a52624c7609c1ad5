//! Declaration parsing
//!
//! ```text
//! decl        := attribute* modifier* decl-body
//! decl-body   := import | type-decl | var-decl | func-decl | init-decl
//!              | deinit-decl | case-decl | typealias | associatedtype
//! type-decl   := ('protocol' | 'struct' | 'class' | 'enum' | 'actor' | 'extension')
//!                NAME generics? (':' type (',' type)*)? where? member-block
//! ```

use super::expr::{capture_expression, continues_expression, ExprContext};
use super::types::parse_type;
use super::{recovery, ParseError, Parser};
use crate::ast::*;
use crate::token::{Span, Token};

/// Words accepted as declaration modifiers.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "package",
    "static",
    "final",
    "lazy",
    "override",
    "mutating",
    "nonmutating",
    "weak",
    "unowned",
    "required",
    "convenience",
    "dynamic",
    "optional",
    "indirect",
    "nonisolated",
    "distributed",
];

/// True if `word` is a declaration modifier.
pub fn is_modifier_word(word: &str) -> bool {
    MODIFIERS.contains(&word)
}

/// Parse one declaration.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, ParseError> {
    let start = parser.current_span();
    let attributes = parse_attributes(parser)?;
    let modifiers = parse_modifiers(parser)?;

    match parser.current().clone() {
        Token::Import => parse_import(parser, start).map(Decl::Import),
        Token::Protocol => parse_type_decl(parser, TypeDeclKind::Protocol, attributes, modifiers, start),
        Token::Struct => parse_type_decl(parser, TypeDeclKind::Struct, attributes, modifiers, start),
        Token::Class => parse_type_decl(parser, TypeDeclKind::Class, attributes, modifiers, start),
        Token::Enum => parse_type_decl(parser, TypeDeclKind::Enum, attributes, modifiers, start),
        Token::Extension => {
            parse_type_decl(parser, TypeDeclKind::Extension, attributes, modifiers, start)
        }
        Token::Identifier(word) if word == "actor" && matches!(parser.peek(), Some(Token::Identifier(_))) => {
            parse_type_decl(parser, TypeDeclKind::Actor, attributes, modifiers, start)
        }
        Token::Var | Token::Let => {
            parse_variable(parser, attributes, modifiers, start).map(Decl::Variable)
        }
        Token::Func => parse_function(parser, attributes, modifiers, start).map(Decl::Function),
        Token::Init => parse_initializer(parser, attributes, modifiers, start).map(Decl::Initializer),
        Token::Deinit => {
            parser.advance();
            let body = parse_optional_body(parser)?;
            Ok(Decl::Deinitializer(DeinitializerDecl {
                body,
                span: parser.span_from(&start),
            }))
        }
        Token::Case => parse_enum_case(parser, attributes, modifiers, start).map(Decl::EnumCase),
        Token::Typealias => parse_typealias(parser, modifiers, start).map(Decl::Typealias),
        Token::Associatedtype => parse_associated_type(parser, start).map(Decl::AssociatedType),
        Token::Subscript => {
            skip_subscript(parser)?;
            Ok(skipped(parser, SkippedKind::Subscript, attributes, start))
        }
        Token::Hash => {
            let kind = skip_directive(parser)?;
            Ok(skipped(parser, kind, attributes, start))
        }
        _ => Err(parser.unexpected_token(&[
            Token::Var,
            Token::Let,
            Token::Func,
            Token::Init,
            Token::Protocol,
            Token::Struct,
            Token::Class,
            Token::Enum,
        ])),
    }
}

fn skipped(parser: &Parser, kind: SkippedKind, attributes: Vec<Attribute>, start: Span) -> Decl {
    tracing::trace!(construct = kind.describe(), "skipped");
    Decl::Skipped(SkippedDecl {
        kind,
        attributes,
        span: parser.span_from(&start),
    })
}

// ============================================================================
// Skipped constructs
// ============================================================================

/// `subscript<T>(params) -> Type { ... }`; the accessor block is optional
/// in protocols that end the line instead.
fn skip_subscript(parser: &mut Parser) -> Result<(), ParseError> {
    parser.expect(Token::Subscript)?;
    parse_generic_clause(parser)?;
    recovery::skip_balanced(parser, Token::LeftParen, Token::RightParen)?;

    while !parser.at_eof() && !parser.check(&Token::RightBrace) {
        if parser.check(&Token::LeftBrace) {
            recovery::skip_balanced(parser, Token::LeftBrace, Token::RightBrace)?;
            return Ok(());
        }
        if parser.newline_before() && starts_member(parser) {
            return Ok(());
        }
        parser.advance();
    }
    Ok(())
}

/// `#if ... #endif` as one block, or a single `#name(args)` directive.
fn skip_directive(parser: &mut Parser) -> Result<SkippedKind, ParseError> {
    let open = parser.expect(Token::Hash)?;

    if parser.eat(&Token::If) {
        let mut depth = 1usize;
        while !parser.at_eof() {
            if parser.eat(&Token::Hash) {
                if parser.eat(&Token::If) {
                    depth += 1;
                } else if parser.eat_word("endif") {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(SkippedKind::ConditionalBlock);
                    }
                }
                continue;
            }
            parser.advance();
        }
        return Err(ParseError::invalid_syntax("'#if' without a matching '#endif'", open)
            .with_suggestion("close the block with '#endif'"));
    }

    if parser.at_eof() || !parser.adjacent_to_previous() {
        return Err(parser.unexpected_token(&[Token::Identifier(String::new())]));
    }
    parser.advance();
    if parser.check(&Token::LeftParen) && parser.adjacent_to_previous() {
        recovery::skip_balanced(parser, Token::LeftParen, Token::RightParen)?;
    }
    Ok(SkippedKind::Directive)
}

/// True when the current token cannot begin a declaration, i.e. it starts
/// executable code at file level.
pub fn starts_statement(parser: &Parser) -> bool {
    match parser.current() {
        Token::Semicolon | Token::Eof => false,
        Token::Identifier(word) if word == "actor" => !matches!(parser.peek(), Some(Token::Identifier(_))),
        Token::Identifier(word) => !is_modifier_word(word),
        tok => !tok.starts_declaration(),
    }
}

/// Skip one file-level statement: up to the end of its line once every
/// bracket is closed, continuing onto lines that carry it on.
pub fn skip_statement(parser: &mut Parser) -> Decl {
    let start = parser.current_span();
    let mut depth = 0usize;

    loop {
        match parser.current() {
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
            Token::RightParen | Token::RightBracket | Token::RightBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
        parser.advance();

        if parser.at_eof() {
            break;
        }
        if depth == 0 {
            if parser.eat(&Token::Semicolon) {
                break;
            }
            if parser.newline_before() && !continues_expression(parser.current()) {
                break;
            }
        }
    }

    skipped(parser, SkippedKind::Statement, Vec::new(), start)
}

// ============================================================================
// Attributes and modifiers
// ============================================================================

/// Parse `@Name` / `@Name(args)` attributes.
///
/// Arguments are only read when `(` directly follows the name, so
/// `@MainActor (Int) -> Void` is not mistaken for a call.
pub fn parse_attributes(parser: &mut Parser) -> Result<Vec<Attribute>, ParseError> {
    let mut attributes = Vec::new();

    while parser.check(&Token::At) {
        let start = parser.expect(Token::At)?;
        let mut name = parser.expect_identifier()?;
        while parser.check(&Token::Dot) && parser.adjacent_to_previous() {
            parser.advance();
            name.push('.');
            name.push_str(&parser.expect_identifier()?);
        }

        let arguments = if parser.check(&Token::LeftParen) && parser.adjacent_to_previous() {
            Some(parse_attribute_arguments(parser)?)
        } else {
            None
        };

        attributes.push(Attribute {
            name,
            arguments,
            span: parser.span_from(&start),
        });
    }

    Ok(attributes)
}

fn parse_attribute_arguments(parser: &mut Parser) -> Result<Vec<AttributeArgument>, ParseError> {
    parser.expect(Token::LeftParen)?;
    let mut arguments = Vec::new();

    while !parser.check(&Token::RightParen) {
        let start = parser.current_span();
        let label = if matches!(parser.peek(), Some(Token::Colon)) {
            let label = parser.current().label_text();
            if label.is_some() {
                parser.advance();
                parser.advance();
            }
            label
        } else {
            None
        };
        let value = capture_expression(parser, ExprContext::Argument)?;
        arguments.push(AttributeArgument {
            label,
            value,
            span: parser.span_from(&start),
        });
        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    parser.expect(Token::RightParen)?;
    Ok(arguments)
}

/// Parse declaration modifiers, including `private(set)` style details.
pub fn parse_modifiers(parser: &mut Parser) -> Result<Vec<Modifier>, ParseError> {
    let mut modifiers = Vec::new();

    loop {
        let span = parser.current_span();
        let name = match parser.current() {
            Token::Identifier(word) if is_modifier_word(word) && !ends_modifier_run(parser.peek()) => {
                word.clone()
            }
            // `class func`, `class var`: the type-level spelling used in classes
            Token::Class if class_is_modifier(parser.peek()) => "class".to_string(),
            _ => break,
        };
        parser.advance();

        let detail = if parser.check(&Token::LeftParen) && parser.adjacent_to_previous() {
            parser.advance();
            let detail = parser
                .current()
                .label_text()
                .ok_or_else(|| parser.unexpected_token(&[Token::Identifier(String::new())]))?;
            parser.advance();
            parser.expect(Token::RightParen)?;
            Some(detail)
        } else {
            None
        };

        modifiers.push(Modifier {
            name,
            detail,
            span: parser.span_from(&span),
        });
    }

    Ok(modifiers)
}

/// A modifier word followed by `:`, `=` or `,` is really a name.
fn ends_modifier_run(next: Option<&Token>) -> bool {
    matches!(next, Some(Token::Colon | Token::Equal | Token::Comma | Token::Eof) | None)
}

fn class_is_modifier(next: Option<&Token>) -> bool {
    match next {
        Some(Token::Var | Token::Let | Token::Func | Token::Subscript | Token::Init | Token::Typealias) => true,
        Some(Token::Identifier(word)) => is_modifier_word(word),
        _ => false,
    }
}

// ============================================================================
// Imports and type declarations
// ============================================================================

fn parse_import(parser: &mut Parser, start: Span) -> Result<ImportDecl, ParseError> {
    parser.expect(Token::Import)?;
    // `import struct Module.Type`
    if parser.check_any(&[Token::Struct, Token::Class, Token::Enum, Token::Protocol, Token::Var, Token::Func]) {
        parser.advance();
    }

    let mut path = parser.expect_identifier()?;
    while parser.eat(&Token::Dot) {
        path.push('.');
        path.push_str(&parser.expect_identifier()?);
    }

    Ok(ImportDecl {
        path,
        span: parser.span_from(&start),
    })
}

fn parse_type_decl(
    parser: &mut Parser,
    kind: TypeDeclKind,
    attributes: Vec<Attribute>,
    modifiers: Vec<Modifier>,
    start: Span,
) -> Result<Decl, ParseError> {
    parser.advance();

    let name = if kind == TypeDeclKind::Extension {
        parse_type(parser)?.to_string()
    } else {
        parser.expect_identifier()?
    };

    let generic_clause = parse_generic_clause(parser)?;

    let mut inheritance = Vec::new();
    if parser.eat(&Token::Colon) {
        loop {
            if parser.eat(&Token::Class) {
                // `protocol P: class`
                inheritance.push(TypeSyntax::named("AnyObject"));
            } else {
                inheritance.push(parse_type(parser)?);
            }
            if !parser.eat(&Token::Comma) {
                break;
            }
        }
    }

    if parser.check(&Token::Where) {
        recovery::skip_until(parser, &[Token::LeftBrace]);
    }

    let members = parse_member_block(parser)?;

    tracing::trace!(kind = kind.keyword(), %name, members = members.decls.len(), "parsed type declaration");

    Ok(Decl::Type(TypeDecl {
        attributes,
        modifiers,
        kind,
        name,
        generic_clause,
        inheritance,
        members,
        span: parser.span_from(&start),
    }))
}

/// `<T: Equatable, U>` kept as written.
fn parse_generic_clause(parser: &mut Parser) -> Result<Option<String>, ParseError> {
    if !parser.check(&Token::Less) {
        return Ok(None);
    }
    let open = parser.current_span();
    let close = recovery::skip_balanced(parser, Token::Less, Token::Greater)?;
    Ok(Some(parser.text(open.start, close.end).to_string()))
}

/// `{ member* }`
pub fn parse_member_block(parser: &mut Parser) -> Result<MemberBlock, ParseError> {
    let open = parser.expect(Token::LeftBrace)?;
    let mut decls = Vec::new();

    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        if parser.eat(&Token::Semicolon) {
            continue;
        }
        match parse_decl(parser) {
            Ok(decl) => decls.push(decl),
            Err(err) => {
                parser.errors.push(err);
                recovery::sync_to_declaration_boundary(parser);
            }
        }
    }

    if parser.at_eof() {
        return Err(ParseError::unclosed(Token::LeftBrace, Token::RightBrace, open));
    }
    let close = parser.expect(Token::RightBrace)?;

    Ok(MemberBlock { decls, open, close })
}

// ============================================================================
// Variables
// ============================================================================

fn parse_variable(
    parser: &mut Parser,
    attributes: Vec<Attribute>,
    modifiers: Vec<Modifier>,
    start: Span,
) -> Result<VariableDecl, ParseError> {
    let binding = if parser.advance() == Token::Let {
        BindingKind::Let
    } else {
        BindingKind::Var
    };

    let mut bindings = Vec::new();
    loop {
        bindings.push(parse_pattern_binding(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    Ok(VariableDecl {
        attributes,
        modifiers,
        binding,
        bindings,
        span: parser.span_from(&start),
    })
}

fn parse_pattern_binding(parser: &mut Parser) -> Result<PatternBinding, ParseError> {
    let start = parser.current_span();
    let pattern = parse_pattern(parser)?;

    let type_annotation = if parser.eat(&Token::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let initializer = if parser.eat(&Token::Equal) {
        Some(capture_expression(parser, ExprContext::Initializer)?)
    } else {
        None
    };

    let accessor = if parser.check(&Token::LeftBrace) {
        Some(parse_accessor_block(parser)?)
    } else {
        None
    };

    Ok(PatternBinding {
        pattern,
        type_annotation,
        initializer,
        accessor,
        span: parser.span_from(&start),
    })
}

fn parse_pattern(parser: &mut Parser) -> Result<Pattern, ParseError> {
    match parser.current() {
        Token::Identifier(name) => {
            let name = name.clone();
            parser.advance();
            Ok(Pattern::Identifier(name))
        }
        Token::Underscore => {
            parser.advance();
            Ok(Pattern::Wildcard)
        }
        Token::LeftParen => {
            parser.advance();
            let mut elements = Vec::new();
            while !parser.check(&Token::RightParen) {
                elements.push(parse_pattern(parser)?);
                if !parser.eat(&Token::Comma) {
                    break;
                }
            }
            parser.expect(Token::RightParen)?;
            Ok(Pattern::Tuple(elements))
        }
        _ => Err(parser.unexpected_token(&[Token::Identifier(String::new()), Token::Underscore, Token::LeftParen])),
    }
}

/// Accessor words that open an explicit accessor list.
fn opens_accessor_list(parser: &Parser) -> bool {
    let mut offset = 1;
    while let Some(Token::Identifier(word)) = parser.peek_nth(offset) {
        if is_modifier_word(word) {
            offset += 1;
            continue;
        }
        return AccessorKind::from_keyword(word).is_some();
    }
    false
}

/// `{ get set }`, `{ get { ... } set(v) { ... } }`, `{ didSet { ... } }` or `{ expr }`
fn parse_accessor_block(parser: &mut Parser) -> Result<AccessorBlock, ParseError> {
    if !opens_accessor_list(parser) {
        return parse_code_block(parser).map(AccessorBlock::Getter);
    }

    let open = parser.expect(Token::LeftBrace)?;
    let mut accessors = Vec::new();

    while !parser.check(&Token::RightBrace) {
        if parser.at_eof() {
            return Err(ParseError::unclosed(Token::LeftBrace, Token::RightBrace, open));
        }
        let _attributes = parse_attributes(parser)?;
        let modifiers = parse_modifiers(parser)?;

        let word = match parser.current() {
            Token::Identifier(word) => word.clone(),
            Token::Init => "init".to_string(),
            _ => return Err(parser.unexpected_token(&[Token::Identifier("get".into())])),
        };
        let kind = AccessorKind::from_keyword(&word).ok_or_else(|| {
            ParseError::invalid_syntax(format!("'{}' is not an accessor", word), parser.current_span())
                .with_suggestion("expected get, set, willSet or didSet")
        })?;
        parser.advance();

        let parameter = if parser.check(&Token::LeftParen) {
            parser.advance();
            let name = parser.expect_identifier()?;
            parser.expect(Token::RightParen)?;
            Some(name)
        } else {
            None
        };

        let effects = parse_effects(parser)?;
        let body = parse_optional_body(parser)?;

        accessors.push(Accessor {
            kind,
            modifiers,
            parameter,
            effects,
            body,
        });
    }

    parser.expect(Token::RightBrace)?;
    Ok(AccessorBlock::Accessors(accessors))
}

// ============================================================================
// Code blocks
// ============================================================================

/// Capture a `{ ... }` body as source text.
pub fn parse_code_block(parser: &mut Parser) -> Result<CodeBlock, ParseError> {
    let open = parser.current_span();
    let close = recovery::skip_balanced(parser, Token::LeftBrace, Token::RightBrace)?;
    let inner = dedent(parser.text(open.end, close.start));

    let statements = if inner.is_empty() {
        Vec::new()
    } else {
        vec![Stmt::Verbatim(inner)]
    };

    Ok(CodeBlock {
        statements,
        span: parser.combine_spans(&open, &close),
    })
}

fn parse_optional_body(parser: &mut Parser) -> Result<Option<CodeBlock>, ParseError> {
    if parser.check(&Token::LeftBrace) {
        parse_code_block(parser).map(Some)
    } else {
        Ok(None)
    }
}

/// Trim blank edges and strip the indentation shared by every line.
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return String::new(),
    };
    let lines = &lines[first..=last];

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line[indent..].trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Functions and initializers
// ============================================================================

fn parse_function(
    parser: &mut Parser,
    attributes: Vec<Attribute>,
    modifiers: Vec<Modifier>,
    start: Span,
) -> Result<FunctionDecl, ParseError> {
    parser.expect(Token::Func)?;

    let name = match parser.current() {
        Token::Identifier(name) | Token::Operator(name) => name.clone(),
        Token::Equal => "=".to_string(),
        Token::Less => "<".to_string(),
        Token::Greater => ">".to_string(),
        _ => return Err(parser.unexpected_token(&[Token::Identifier(String::new())])),
    };
    parser.advance();

    let generic_clause = parse_generic_clause(parser)?;
    let params = parse_parameter_clause(parser)?;
    let effects = parse_effects(parser)?;

    let return_type = if parser.eat(&Token::Arrow) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    skip_where_clause(parser);
    let body = parse_optional_body(parser)?;

    tracing::trace!(%name, params = params.len(), "parsed function");

    Ok(FunctionDecl {
        attributes,
        modifiers,
        name,
        generic_clause,
        params,
        effects,
        return_type,
        body,
        span: parser.span_from(&start),
    })
}

fn parse_initializer(
    parser: &mut Parser,
    attributes: Vec<Attribute>,
    modifiers: Vec<Modifier>,
    start: Span,
) -> Result<InitializerDecl, ParseError> {
    parser.expect(Token::Init)?;

    let failable = match parser.current() {
        Token::Question if parser.adjacent_to_previous() => Some('?'),
        Token::Bang if parser.adjacent_to_previous() => Some('!'),
        _ => None,
    };
    if failable.is_some() {
        parser.advance();
    }

    let _generic_clause = parse_generic_clause(parser)?;
    let params = parse_parameter_clause(parser)?;
    let effects = parse_effects(parser)?;
    skip_where_clause(parser);
    let body = parse_optional_body(parser)?;

    Ok(InitializerDecl {
        attributes,
        modifiers,
        failable,
        params,
        effects,
        body,
        span: parser.span_from(&start),
    })
}

/// `async`, `throws`, `rethrows`, `throws(E)`
fn parse_effects(parser: &mut Parser) -> Result<Effects, ParseError> {
    let mut effects = Effects::default();

    loop {
        if parser.eat_word("async") {
            effects.is_async = true;
        } else if parser.eat(&Token::Throws) {
            effects.throws = Some(parse_thrown_type(parser)?.map_or(ThrowsKind::Throws, ThrowsKind::Typed));
        } else if parser.eat(&Token::Rethrows) {
            effects.throws = Some(ThrowsKind::Rethrows);
        } else {
            return Ok(effects);
        }
    }
}

/// The `(E)` of `throws(E)`, directly after `throws`.
pub fn parse_thrown_type(parser: &mut Parser) -> Result<Option<TypeSyntax>, ParseError> {
    if !(parser.check(&Token::LeftParen) && parser.adjacent_to_previous()) {
        return Ok(None);
    }
    parser.expect(Token::LeftParen)?;
    let ty = parse_type(parser)?;
    parser.expect(Token::RightParen)?;
    Ok(Some(ty))
}

/// Skip a trailing `where` clause; it ends at the body or at the next line
/// that starts a declaration.
fn skip_where_clause(parser: &mut Parser) {
    if !parser.eat(&Token::Where) {
        return;
    }
    while !parser.at_eof() && !parser.check_any(&[Token::LeftBrace, Token::RightBrace]) {
        if parser.newline_before() && starts_member(parser) {
            return;
        }
        parser.advance();
    }
}

fn starts_member(parser: &Parser) -> bool {
    match parser.current() {
        Token::Identifier(word) => is_modifier_word(word),
        tok => tok.starts_declaration(),
    }
}

/// `(label name: Type = default, ...)`
fn parse_parameter_clause(parser: &mut Parser) -> Result<Vec<Param>, ParseError> {
    parser.expect(Token::LeftParen)?;
    let mut params = Vec::new();

    while !parser.check(&Token::RightParen) {
        params.push(parse_parameter(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    parser.expect(Token::RightParen)?;
    Ok(params)
}

fn parse_parameter(parser: &mut Parser) -> Result<Param, ParseError> {
    let start = parser.current_span();
    let _attributes = parse_attributes(parser)?;

    let first = parser
        .current()
        .label_text()
        .ok_or_else(|| parser.unexpected_token(&[Token::Identifier(String::new()), Token::Underscore]))?;
    parser.advance();

    let (external, internal) = if parser.check(&Token::Colon) {
        (first.clone(), first)
    } else {
        let second = parser
            .current()
            .label_text()
            .ok_or_else(|| parser.unexpected_token(&[Token::Colon]))?;
        parser.advance();
        (first, second)
    };
    parser.expect(Token::Colon)?;

    let ty = parse_type(parser)?;
    let is_variadic = parser.eat(&Token::DotDotDot);

    let default_value = if parser.eat(&Token::Equal) {
        Some(capture_expression(parser, ExprContext::Argument)?)
    } else {
        None
    };

    Ok(Param {
        external_name: if external == "_" { None } else { Some(external) },
        internal_name: internal,
        ty,
        is_variadic,
        default_value,
        span: parser.span_from(&start),
    })
}

// ============================================================================
// Enum cases and aliases
// ============================================================================

fn parse_enum_case(
    parser: &mut Parser,
    attributes: Vec<Attribute>,
    modifiers: Vec<Modifier>,
    start: Span,
) -> Result<EnumCaseDecl, ParseError> {
    parser.expect(Token::Case)?;
    let mut elements = Vec::new();

    loop {
        let name = parser
            .current()
            .label_text()
            .ok_or_else(|| parser.unexpected_token(&[Token::Identifier(String::new())]))?;
        parser.advance();

        let associated_values = if parser.check(&Token::LeftParen) {
            let open = parser.current_span();
            let close = recovery::skip_balanced(parser, Token::LeftParen, Token::RightParen)?;
            Some(parser.text(open.start, close.end).to_string())
        } else {
            None
        };

        let raw_value = if parser.eat(&Token::Equal) {
            Some(capture_expression(parser, ExprContext::Initializer)?)
        } else {
            None
        };

        elements.push(EnumCaseElement {
            name,
            associated_values,
            raw_value,
        });
        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    Ok(EnumCaseDecl {
        attributes,
        modifiers,
        elements,
        span: parser.span_from(&start),
    })
}

fn parse_typealias(parser: &mut Parser, modifiers: Vec<Modifier>, start: Span) -> Result<TypealiasDecl, ParseError> {
    parser.expect(Token::Typealias)?;
    let name = parser.expect_identifier()?;
    parse_generic_clause(parser)?;
    parser.expect(Token::Equal)?;
    let ty = parse_type(parser)?;

    Ok(TypealiasDecl {
        modifiers,
        name,
        ty,
        span: parser.span_from(&start),
    })
}

fn parse_associated_type(parser: &mut Parser, start: Span) -> Result<AssociatedTypeDecl, ParseError> {
    parser.expect(Token::Associatedtype)?;
    let name = parser.expect_identifier()?;

    if parser.eat(&Token::Colon) {
        loop {
            parse_type(parser)?;
            if !parser.eat(&Token::Comma) {
                break;
            }
        }
    }
    if parser.eat(&Token::Equal) {
        parse_type(parser)?;
    }
    skip_where_clause(parser);

    Ok(AssociatedTypeDecl {
        name,
        span: parser.span_from(&start),
    })
}
