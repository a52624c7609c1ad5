//! Structural questions about single members
//!
//! Classification never fails: a question that cannot be answered from the
//! syntax alone gets the conservative answer ("not stored", "not optional").

use crate::model::FunctionSignature;
use siberian_syntax::ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyShape {
    /// Holds its own storage and must be set by an initializer
    pub is_stored: bool,
    /// Declared as `T?` or `T!`
    pub is_optional: bool,
    /// `let`, or accessors without a setter
    pub is_read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionShape {
    pub arity: usize,
    pub has_return: bool,
    pub is_async: bool,
    pub is_throwing: bool,
}

/// Classify a property declaration.
///
/// A property is stored when it has exactly one binding, is not `lazy`, is
/// not a `let` that already has a value, is not type-level and has either
/// no accessor block or only `willSet`/`didSet` observers.
pub fn classify_property(var: &VariableDecl) -> PropertyShape {
    let binding = match var.bindings.first() {
        Some(binding) => binding,
        None => return PropertyShape::default(),
    };

    let observers_only = match &binding.accessor {
        None => true,
        Some(AccessorBlock::Getter(_)) => false,
        Some(AccessorBlock::Accessors(accessors)) => accessors.iter().all(|a| a.kind.is_observer()),
    };

    let is_stored = var.bindings.len() == 1
        && !var.has_modifier("lazy")
        && !var.is_type_level()
        && !(var.binding == BindingKind::Let && binding.initializer.is_some())
        && observers_only;

    let is_read_only = var.binding == BindingKind::Let
        || matches!(&binding.accessor, Some(block) if !observers_only && !block.has(AccessorKind::Set));

    PropertyShape {
        is_stored,
        is_optional: binding.type_annotation.as_ref().is_some_and(TypeSyntax::is_optional),
        is_read_only,
    }
}

pub fn classify_function(function: &FunctionSignature) -> FunctionShape {
    FunctionShape {
        arity: function.params.len(),
        has_return: function.return_type.is_some(),
        is_async: function.is_async(),
        is_throwing: function.is_throwing(),
    }
}

/// Instance properties of `decl` with stored shape, in declaration order.
pub fn stored_properties(decl: &TypeDecl) -> impl Iterator<Item = &VariableDecl> {
    decl.variables().filter(|var| classify_property(var).is_stored)
}
