//! Members for one property requirement

use super::{member_modifiers, GeneratedMember, MemberRole};
use crate::model::{Mutability, PropertySignature};
use siberian_syntax::ast::*;

/// Generate the members that satisfy `property`.
///
/// An optional property becomes a plain stored property with the
/// requirement's accessor block dropped. Anything else is forwarded to a
/// backing field:
///
/// ```text
/// var name: String {
///     get { __name }
///     set { __name = newValue }
/// }
/// var __name: String!
/// ```
///
/// The setter is only present when the requirement declares `set`.
pub fn generate_property_mock(
    property: &PropertySignature,
    backing_prefix: &str,
    access: Option<&str>,
) -> Vec<GeneratedMember> {
    let modifiers = member_modifiers(access, property.is_static);

    if property.is_optional() {
        let stored = VariableDecl::stored(&property.name, property.ty.clone()).with_modifiers(modifiers);
        return vec![GeneratedMember::new(MemberRole::Passthrough, stored)];
    }

    let backing = format!("{}{}", backing_prefix, property.name);
    let mut accessors = vec![Accessor::new(
        AccessorKind::Get,
        Some(CodeBlock::new(vec![Stmt::Expr(Expr::ident(&backing))])),
    )];
    if property.mutability == Mutability::ReadWrite {
        accessors.push(Accessor::new(
            AccessorKind::Set,
            Some(CodeBlock::new(vec![Stmt::assign(
                Expr::ident(&backing),
                Expr::ident("newValue"),
            )])),
        ));
    }

    let accessor = VariableDecl::stored(&property.name, property.ty.clone())
        .with_modifiers(modifiers.clone())
        .with_accessor(AccessorBlock::Accessors(accessors));
    let storage = VariableDecl::stored(backing, property.ty.made_implicitly_unwrapped()).with_modifiers(modifiers);

    vec![
        GeneratedMember::new(MemberRole::PropertyAccessor, accessor),
        GeneratedMember::new(MemberRole::BackingStorage, storage),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use siberian_syntax::print_decls;

    fn property(ty: TypeSyntax, mutability: Mutability) -> PropertySignature {
        PropertySignature {
            name: "someProperty".into(),
            ty,
            mutability,
            is_static: false,
            span: Default::default(),
        }
    }

    fn print(members: &[GeneratedMember]) -> String {
        let decls: Vec<Decl> = members.iter().map(|m| m.decl.clone()).collect();
        print_decls(&decls, 4)
    }

    #[test]
    fn test_read_write_property() {
        let members = generate_property_mock(&property(TypeSyntax::named("Int"), Mutability::ReadWrite), "__", None);
        assert_eq!(
            print(&members),
            "var someProperty: Int {
    get { __someProperty }
    set { __someProperty = newValue }
}
var __someProperty: Int!"
        );
    }

    #[test]
    fn test_read_only_property_has_no_setter() {
        let members = generate_property_mock(&property(TypeSyntax::named("Int"), Mutability::ReadOnly), "_", Some("public"));
        assert_eq!(
            print(&members),
            "public var someProperty: Int {
    get { _someProperty }
}
public var _someProperty: Int!"
        );
    }

    #[test]
    fn test_optional_property_is_relayed_without_accessors() {
        let ty = TypeSyntax::optional(TypeSyntax::named("String"));
        let members = generate_property_mock(&property(ty, Mutability::ReadOnly), "__", None);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, MemberRole::Passthrough);
        assert_eq!(print(&members), "var someProperty: String?");
    }
}
