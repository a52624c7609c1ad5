//! Abstract Syntax Tree for the declaration subset
//!
//! The tree covers what declaration macros read and produce: type
//! declarations, their members and the signatures of those members.
//! Function and accessor bodies from user code are kept as source text.

pub mod declaration;
pub mod expression;
pub mod types;

pub use declaration::*;
pub use expression::*;
pub use types::*;

use crate::token::Span;

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub decls: Vec<Decl>,
    pub span: Span,
}

impl SourceFile {
    pub fn new(decls: Vec<Decl>, span: Span) -> Self {
        Self { decls, span }
    }

    /// Type declarations at file level, in order
    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter().filter_map(Decl::as_type)
    }

    /// First type declaration with the given name
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.type_decls().find(|decl| decl.name == name)
    }
}
