//! Interface model
//!
//! A protocol declaration reduced to what the mock generators need: the
//! ordered property and function requirements with their signatures.

use crate::classifier::classify_property;
use crate::context::ExpansionContext;
use siberian_syntax::ast::*;
use siberian_syntax::Span;

const DOMAIN: &str = "AutoMockable";

/// A protocol and its requirements, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub name: String,
    /// Access modifier written on the protocol (`public`, `private`, ...)
    pub access: Option<String>,
    pub members: Vec<MemberSignature>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberSignature {
    Property(PropertySignature),
    Function(FunctionSignature),
}

impl MemberSignature {
    pub fn name(&self) -> &str {
        match self {
            MemberSignature::Property(p) => &p.name,
            MemberSignature::Function(f) => &f.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            MemberSignature::Property(p) => p.span,
            MemberSignature::Function(f) => f.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// `{ get }`
    ReadOnly,
    /// `{ get set }`
    ReadWrite,
}

/// `var name: Type { get [set] }`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: String,
    pub ty: TypeSyntax,
    pub mutability: Mutability,
    pub is_static: bool,
    pub span: Span,
}

impl PropertySignature {
    pub fn is_optional(&self) -> bool {
        self.ty.is_optional()
    }
}

/// `func name(params) async throws -> Return`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    /// Generic parameter clause as written; reproduced but not analyzed
    pub generic_clause: Option<String>,
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeSyntax>,
    pub effects: Effects,
    pub is_static: bool,
    pub span: Span,
}

impl FunctionSignature {
    pub fn is_async(&self) -> bool {
        self.effects.is_async
    }

    /// True when calls may throw. A `rethrows` requirement only throws
    /// through its arguments, so its mock does not.
    pub fn is_throwing(&self) -> bool {
        matches!(self.effects.throws, Some(ThrowsKind::Throws | ThrowsKind::Typed(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Argument label; `None` for `_`
    pub external_name: Option<String>,
    /// Local name; a `_` local name is replaced by `arg<index>`
    pub internal_name: String,
    pub ty: TypeSyntax,
    pub is_variadic: bool,
    pub span: Span,
}

impl Parameter {
    fn from_param(param: &Param, index: usize) -> Self {
        let internal_name = if param.internal_name == "_" {
            format!("arg{}", index)
        } else {
            param.internal_name.clone()
        };
        Self {
            external_name: param.external_name.clone(),
            internal_name,
            ty: param.ty.clone(),
            is_variadic: param.is_variadic,
            span: param.span,
        }
    }

    /// Type of a property recording this argument.
    ///
    /// Inside the body a variadic `T...` parameter is an array `[T]`.
    pub fn stored_type(&self) -> TypeSyntax {
        let ty = self.ty.without_attributes();
        if self.is_variadic {
            TypeSyntax::array(ty)
        } else {
            ty
        }
    }

    /// Type of this argument in the override closure.
    pub fn closure_type(&self) -> TypeSyntax {
        if self.is_variadic {
            TypeSyntax::array(self.ty.without_attributes())
        } else {
            self.ty.clone()
        }
    }

    /// The argument as passed on to the override closure.
    pub fn forwarded(&self) -> Expr {
        let value = Expr::ident(self.internal_name.clone());
        if self.ty.is_inout() {
            Expr::InOut(Box::new(value))
        } else {
            value
        }
    }

    /// Back to a declaration parameter, with the resolved local name.
    pub fn to_param(&self) -> Param {
        Param {
            external_name: self.external_name.clone(),
            internal_name: self.internal_name.clone(),
            ty: self.ty.clone(),
            is_variadic: self.is_variadic,
            default_value: None,
            span: self.span,
        }
    }
}

impl InterfaceDeclaration {
    /// Build the model from a protocol declaration.
    ///
    /// Requirements the generators cannot mock are reported as warnings and
    /// left out.
    pub fn from_protocol(decl: &TypeDecl, ctx: &mut ExpansionContext) -> Self {
        let mut members = Vec::new();

        for member in &decl.members.decls {
            match member {
                Decl::Variable(var) => property_signatures(var, ctx, &mut members),
                Decl::Function(func) if !is_identifier(&func.name) => ctx.warn(
                    DOMAIN,
                    "unsupportedRequirement",
                    format!("operator requirement '{}' is not mocked", func.name),
                    func.span,
                ),
                Decl::Function(func) => {
                    if func.generic_clause.is_some() {
                        ctx.warn(
                            DOMAIN,
                            "genericRequirement",
                            format!("generic function '{}' is mocked without generic support", func.name),
                            func.span,
                        );
                    }
                    members.push(MemberSignature::Function(FunctionSignature::from_decl(func)));
                }
                other => ctx.warn(
                    DOMAIN,
                    "unsupportedRequirement",
                    format!("{} requirements are not mocked", other.kind_name()),
                    *other.span(),
                ),
            }
        }

        Self {
            name: decl.name.clone(),
            access: decl.access_level().map(str::to_string),
            members,
            span: decl.span,
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertySignature> {
        self.members.iter().filter_map(|m| match m {
            MemberSignature::Property(p) => Some(p),
            MemberSignature::Function(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.members.iter().filter_map(|m| match m {
            MemberSignature::Function(f) => Some(f),
            MemberSignature::Property(_) => None,
        })
    }
}

impl FunctionSignature {
    pub fn from_decl(func: &FunctionDecl) -> Self {
        Self {
            name: func.name.clone(),
            generic_clause: func.generic_clause.clone(),
            params: func
                .params
                .iter()
                .enumerate()
                .map(|(i, p)| Parameter::from_param(p, i))
                .collect(),
            return_type: func.return_type.clone(),
            effects: func.effects.clone(),
            is_static: func.is_type_level(),
            span: func.span,
        }
    }
}

/// Operator functions (`==`, `+`) have no name to derive companions from.
fn is_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '`')
}

fn property_signatures(var: &VariableDecl, ctx: &mut ExpansionContext, out: &mut Vec<MemberSignature>) {
    let mutability = if classify_property(var).is_read_only {
        Mutability::ReadOnly
    } else {
        Mutability::ReadWrite
    };

    for binding in &var.bindings {
        match (binding.pattern.identifier(), &binding.type_annotation) {
            (Some(name), Some(ty)) => out.push(MemberSignature::Property(PropertySignature {
                name: name.to_string(),
                ty: ty.clone(),
                mutability,
                is_static: var.is_type_level(),
                span: var.span,
            })),
            _ => ctx.warn(
                DOMAIN,
                "untypedRequirement",
                "property requirement without a name and type annotation is not mocked",
                binding.span,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionConfig;
    use siberian_syntax::parse;

    fn interface(source: &str) -> (InterfaceDeclaration, usize) {
        let file = parse(source).unwrap();
        let config = ExpansionConfig::default();
        let mut ctx = ExpansionContext::new(&config);
        let decl = file.type_decls().next().unwrap();
        let model = InterfaceDeclaration::from_protocol(decl, &mut ctx);
        (model, ctx.diagnostics().len())
    }

    #[test]
    fn test_members_keep_order() {
        let (model, warnings) = interface(
            "public protocol P {\n    func a()\n    var b: Int { get }\n    static var c: String? { get set }\n}",
        );
        assert_eq!(warnings, 0);
        assert_eq!(model.access.as_deref(), Some("public"));
        let names: Vec<_> = model.members.iter().map(MemberSignature::name).collect();
        assert_eq!(names, ["a", "b", "c"]);

        let props: Vec<_> = model.properties().collect();
        assert_eq!(props[0].mutability, Mutability::ReadOnly);
        assert_eq!(props[1].mutability, Mutability::ReadWrite);
        assert!(props[1].is_static);
        assert!(props[1].is_optional());
    }

    #[test]
    fn test_wildcard_local_name_gets_index() {
        let (model, _) = interface("protocol P {\n    func f(_ a: Int, label _: String)\n}");
        let f = model.functions().next().unwrap();
        assert_eq!(f.params[0].internal_name, "a");
        assert_eq!(f.params[0].external_name, None);
        assert_eq!(f.params[1].internal_name, "arg1");
        assert_eq!(f.params[1].external_name.as_deref(), Some("label"));
    }

    #[test]
    fn test_unsupported_requirements_warn() {
        let (model, warnings) = interface(
            "protocol P {\n    associatedtype Item\n    init(x: Int)\n    func make<T>() -> T\n}",
        );
        assert_eq!(model.members.len(), 1);
        assert_eq!(warnings, 3);
    }

    #[test]
    fn test_operators_and_skipped_members_warn() {
        let file = parse(
            "protocol Money {\n    static func == (lhs: Self, rhs: Self) -> Bool\n    static func +(lhs: Self, rhs: Self) -> Self\n    subscript(currency: String) -> Int { get }\n    #if DEBUG\n    func dump()\n    #endif\n    func total() -> Int\n}",
        )
        .unwrap();
        let config = ExpansionConfig::default();
        let mut ctx = ExpansionContext::new(&config);
        let model = InterfaceDeclaration::from_protocol(file.type_decls().next().unwrap(), &mut ctx);

        let names: Vec<_> = model.members.iter().map(MemberSignature::name).collect();
        assert_eq!(names, ["total"]);
        let messages: Vec<_> = ctx.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "operator requirement '==' is not mocked",
                "operator requirement '+' is not mocked",
                "subscript requirements are not mocked",
                "conditional compilation block requirements are not mocked",
            ]
        );
        assert!(ctx.diagnostics().iter().all(|d| d.id.id == "unsupportedRequirement"));
    }

    #[test]
    fn test_parameter_types() {
        let (model, _) = interface(
            "protocol P {\n    func f(_ v: inout Int, _ c: @escaping () -> Void, _ xs: Int...)\n}",
        );
        let params = &model.functions().next().unwrap().params;
        assert_eq!(params[0].stored_type().to_string(), "Int");
        assert_eq!(params[0].closure_type().to_string(), "inout Int");
        assert_eq!(params[0].forwarded().to_string(), "&v");
        assert_eq!(params[1].stored_type().to_string(), "() -> Void");
        assert_eq!(params[1].closure_type().to_string(), "@escaping () -> Void");
        assert_eq!(params[2].stored_type().to_string(), "[Int]");
        assert_eq!(params[2].closure_type().to_string(), "[Int]");
    }
}
