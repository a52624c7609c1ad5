//! Siberian syntax
//!
//! Lexer, parser and printer for the declaration subset of Swift that the
//! Siberian macros read and generate: attributes, modifiers, type
//! declarations, properties with accessor blocks, functions, initializers
//! and enum cases. Bodies are carried as text and never interpreted.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::SourceFile;
pub use lexer::{LexError, Lexer};
pub use parser::{parse, ParseError, ParseErrorKind, Parser, SyntaxError};
pub use printer::{print_decl, print_decls, Printer, DEFAULT_INDENT};
pub use token::{Span, Token};
