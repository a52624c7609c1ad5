//! Mock class assembly

use super::{generate_function_mock, generate_property_mock, member_modifiers, GeneratedMember};
use crate::context::ExpansionContext;
use crate::model::InterfaceDeclaration;
use crate::naming::StemAllocator;
use siberian_syntax::ast::*;

/// A mock class before it is turned into a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct MockType {
    /// `<prefix><Interface>`
    pub name: String,
    pub conformance: String,
    /// Access modifier of the protocol, copied onto the class
    pub access: Option<String>,
    /// Property members first, then function members, each in requirement order
    pub members: Vec<GeneratedMember>,
}

/// Assemble the mock of `interface`.
pub fn assemble_mock(interface: &InterfaceDeclaration, ctx: &mut ExpansionContext) -> MockType {
    let config = &ctx.config().mock;
    let access = interface.access.as_deref();
    let mut members = Vec::new();

    for property in interface.properties() {
        members.extend(generate_property_mock(property, &config.backing_prefix, access));
    }

    let mut stems = StemAllocator::new(config.naming);
    for function in interface.functions() {
        let stem = stems.allocate(function);
        members.extend(generate_function_mock(function, &stem, access, ctx));
    }

    MockType {
        name: format!("{}{}", config.prefix, interface.name),
        conformance: interface.name.clone(),
        access: interface.access.clone(),
        members,
    }
}

impl MockType {
    /// `class Mock<Name>: <Name> { init() { } members... }`
    pub fn into_decl(self) -> Decl {
        let init = InitializerDecl {
            attributes: Vec::new(),
            modifiers: member_modifiers(self.access.as_deref(), false),
            failable: None,
            params: Vec::new(),
            effects: Effects::default(),
            body: Some(CodeBlock::default()),
            span: Default::default(),
        };

        let mut decls = Vec::with_capacity(self.members.len() + 1);
        decls.push(Decl::Initializer(init));
        decls.extend(self.members.into_iter().map(|m| m.decl));

        Decl::Type(TypeDecl {
            attributes: Vec::new(),
            modifiers: self.access.map(Modifier::new).into_iter().collect(),
            kind: TypeDeclKind::Class,
            name: self.name,
            generic_clause: None,
            inheritance: vec![TypeSyntax::named(self.conformance)],
            members: MemberBlock::new(decls),
            span: Default::default(),
        })
    }
}
