//! `@CustomCodable` and `@CodableKey`
//!
//! `@CustomCodable` adds a `CodingKeys` enum with one case per property.
//! A property annotated `@CodableKey(name: "key")` gets `"key"` as its raw
//! value:
//!
//! ```text
//! @CustomCodable
//! struct Note {
//!     let id: Int
//!     @CodableKey(name: "auxiliary_info_by_user")
//!     let note: String
//! }
//! ```
//!
//! gains
//!
//! ```text
//! enum CodingKeys: String, CodingKey {
//!     case id
//!     case note = "auxiliary_info_by_user"
//! }
//! ```

use crate::context::ExpansionContext;
use crate::error::MacroError;
use crate::registry::{Macro, MacroKind, MacroRegistry, MacroRole};
use siberian_syntax::ast::*;

pub const CODABLE_KEY: &str = "CodableKey";

pub struct CustomCodable;

impl Macro for CustomCodable {
    fn name(&self) -> &'static str {
        "CustomCodable"
    }

    fn role(&self) -> MacroRole {
        MacroRole::Member
    }

    fn expand(&self, attribute: &Attribute, decl: &Decl, _ctx: &mut ExpansionContext) -> Result<Vec<Decl>, MacroError> {
        match decl {
            Decl::Type(ty) if ty.kind.is_aggregate() => Ok(vec![Decl::Type(coding_keys(ty))]),
            other => Err(MacroError::shape_mismatch(
                self.name(),
                "structs or classes",
                other.kind_name(),
                attribute.span,
            )),
        }
    }
}

/// Marker read by `@CustomCodable`; generates nothing itself.
pub struct CodableKey;

impl Macro for CodableKey {
    fn name(&self) -> &'static str {
        CODABLE_KEY
    }

    fn role(&self) -> MacroRole {
        MacroRole::Member
    }

    fn expand(&self, attribute: &Attribute, _decl: &Decl, ctx: &mut ExpansionContext) -> Result<Vec<Decl>, MacroError> {
        let has_string = attribute
            .first_argument()
            .and_then(|arg| arg.value.as_string_literal())
            .is_some();
        if !has_string {
            ctx.warn(
                CODABLE_KEY,
                "missingKeyName",
                "@CodableKey expects a string key, e.g. @CodableKey(name: \"key\")",
                attribute.span,
            );
        }
        Ok(Vec::new())
    }
}

/// `enum CodingKeys: String, CodingKey` over every named property of `decl`.
pub fn coding_keys(decl: &TypeDecl) -> TypeDecl {
    let registry = MacroRegistry::global();
    let cases = decl
        .variables()
        .filter_map(|var| {
            let name = var.property_name()?;
            let raw_value = var
                .attributes
                .iter()
                .find(|attr| registry.lookup(&attr.name) == Some(MacroKind::CodableKey))
                .and_then(Attribute::first_argument)
                .map(|arg| arg.value.clone());
            Some(Decl::EnumCase(EnumCaseDecl {
                attributes: Vec::new(),
                modifiers: Vec::new(),
                elements: vec![EnumCaseElement {
                    name: name.to_string(),
                    associated_values: None,
                    raw_value,
                }],
                span: Default::default(),
            }))
        })
        .collect();

    TypeDecl {
        attributes: Vec::new(),
        modifiers: Vec::new(),
        kind: TypeDeclKind::Enum,
        name: "CodingKeys".to_string(),
        generic_clause: None,
        inheritance: vec![TypeSyntax::named("String"), TypeSyntax::named("CodingKey")],
        members: MemberBlock::new(cases),
        span: Default::default(),
    }
}
