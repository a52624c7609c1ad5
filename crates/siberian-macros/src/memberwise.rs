//! `@PublicMemberwiseInit`
//!
//! Adds an initializer that takes one argument per stored property, in
//! declaration order, and assigns each to `self`:
//!
//! ```text
//! public init(x: Int, y: Double) {
//!     self.x = x
//!     self.y = y
//! }
//! ```

use crate::classifier::stored_properties;
use crate::context::ExpansionContext;
use crate::error::MacroError;
use crate::registry::{Macro, MacroRole};
use siberian_syntax::ast::*;

pub struct PublicMemberwiseInit;

impl Macro for PublicMemberwiseInit {
    fn name(&self) -> &'static str {
        "PublicMemberwiseInit"
    }

    fn role(&self) -> MacroRole {
        MacroRole::Member
    }

    fn expand(&self, attribute: &Attribute, decl: &Decl, ctx: &mut ExpansionContext) -> Result<Vec<Decl>, MacroError> {
        let aggregate = match decl {
            Decl::Type(ty) if ty.kind.is_aggregate() => ty,
            other => {
                return Err(MacroError::shape_mismatch(
                    self.name(),
                    "structs or classes",
                    other.kind_name(),
                    attribute.span,
                ))
            }
        };

        if let Some(existing) = aggregate.initializers().next() {
            ctx.warn(
                self.name(),
                "existingInitializer",
                format!(
                    "'{}' already declares an initializer; the memberwise initializer may duplicate it",
                    aggregate.name
                ),
                existing.span,
            );
        }

        let init = memberwise_initializer(aggregate, &ctx.config().memberwise.access, ctx);
        tracing::debug!(ty = %aggregate.name, params = init.params.len(), attribute = %attribute.name, "memberwise init");
        Ok(vec![Decl::Initializer(init)])
    }
}

/// Build the initializer over the stored instance properties of `decl`.
pub fn memberwise_initializer(decl: &TypeDecl, access: &str, ctx: &mut ExpansionContext) -> InitializerDecl {
    let mut params = Vec::new();
    let mut body = Vec::new();

    for var in stored_properties(decl) {
        let binding = match var.bindings.first() {
            Some(binding) => binding,
            None => continue,
        };
        let name = match binding.pattern.identifier() {
            Some(name) => name,
            None => continue,
        };
        let ty = match &binding.type_annotation {
            Some(ty) => ty,
            None => {
                ctx.warn(
                    "PublicMemberwiseInit",
                    "untypedProperty",
                    format!("stored property '{}' has no type annotation and is left out of the initializer", name),
                    var.span,
                );
                continue;
            }
        };

        params.push(Param::new(name, parameter_type(ty)));
        body.push(Stmt::assign(
            Expr::member(Expr::ident("self"), name),
            Expr::ident(name),
        ));
    }

    let modifiers = if access.is_empty() {
        Vec::new()
    } else {
        vec![Modifier::new(access)]
    };

    InitializerDecl {
        attributes: Vec::new(),
        modifiers,
        failable: None,
        params,
        effects: Effects::default(),
        body: Some(CodeBlock::new(body)),
        span: Default::default(),
    }
}

/// Closures stored in a property escape the initializer.
fn parameter_type(ty: &TypeSyntax) -> TypeSyntax {
    match ty {
        TypeSyntax::Function(_) => TypeSyntax::Attributed {
            specifier: None,
            attributes: vec!["@escaping".to_string()],
            base: Box::new(ty.clone()),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionConfig;
    use pretty_assertions::assert_eq;
    use siberian_syntax::{parse, print_decl};

    fn expand(source: &str) -> (Result<String, MacroError>, usize) {
        let file = parse(source).unwrap();
        let config = ExpansionConfig::default();
        let mut ctx = ExpansionContext::new(&config);
        let result = PublicMemberwiseInit
            .expand(&Attribute::new("PublicMemberwiseInit"), &file.decls[0], &mut ctx)
            .map(|decls| print_decl(&decls[0]));
        (result, ctx.diagnostics().len())
    }

    #[test]
    fn test_stored_properties_in_order() {
        let (init, warnings) = expand(
            "class Sample {
    var x: Int
    let y: Double

    var myComputedProperty: String {
        \"hello world\"
    }

    private var _something: Bool

    var something: Bool {
        get { _something }
        set { _something = newValue }
    }

    func sayHi() {
    }
}",
        );
        assert_eq!(warnings, 0);
        assert_eq!(
            init.unwrap(),
            "public init(x: Int, y: Double, _something: Bool) {
    self.x = x
    self.y = y
    self._something = _something
}"
        );
    }

    #[test]
    fn test_no_stored_properties() {
        let (init, _) = expand("struct Empty {\n    var computed: Int { 1 }\n    static var shared: Int = 0\n}");
        assert_eq!(init.unwrap(), "public init() {\n}");
    }

    #[test]
    fn test_closure_property_escapes() {
        let (init, _) = expand("struct Handler {\n    var onTap: () -> Void\n    var onLoad: (() -> Void)?\n}");
        assert_eq!(
            init.unwrap(),
            "public init(onTap: @escaping () -> Void, onLoad: (() -> Void)?) {\n    self.onTap = onTap\n    self.onLoad = onLoad\n}"
        );
    }

    #[test]
    fn test_untyped_property_is_skipped_with_warning() {
        let (init, warnings) = expand("struct S {\n    var count = 0\n    var name: String\n}");
        assert_eq!(warnings, 1);
        assert_eq!(init.unwrap(), "public init(name: String) {\n    self.name = name\n}");
    }

    #[test]
    fn test_existing_initializer_warns() {
        let (init, warnings) = expand("struct S {\n    var a: Int\n    init() {\n        a = 0\n    }\n}");
        assert!(init.is_ok());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_rejects_enums_and_protocols() {
        for source in ["enum E {\n    case a\n}", "protocol P {\n}"] {
            let (result, _) = expand(source);
            assert_eq!(
                result.unwrap_err().to_string(),
                "@PublicMemberwiseInit is only applicable to structs or classes"
            );
        }
    }

    #[test]
    fn test_access_from_config() {
        let file = parse("struct S {\n    var a: Int\n}").unwrap();
        let mut config = ExpansionConfig::default();
        config.memberwise.access = String::new();
        let mut ctx = ExpansionContext::new(&config);
        let decls = PublicMemberwiseInit
            .expand(&Attribute::new("PublicMemberwiseInit"), &file.decls[0], &mut ctx)
            .unwrap();
        assert_eq!(print_decl(&decls[0]), "init(a: Int) {\n    self.a = a\n}");
    }
}
