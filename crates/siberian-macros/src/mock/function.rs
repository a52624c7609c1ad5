//! Companion members for one function requirement

use super::{member_modifiers, GeneratedMember, MemberRole};
use crate::classifier::classify_function;
use crate::context::ExpansionContext;
use crate::model::{FunctionSignature, Parameter};
use crate::naming::{capitalize_first, NameStem};
use siberian_syntax::ast::*;

/// Generate the members that mock `function`, in this order:
///
/// 1. `<stem>CallsCount`, the call counter
/// 2. `<stem>Called`, true once the counter is positive
/// 3. `<stem>Received<Name>` (one parameter) or `<stem>ReceivedArguments`
///    (several), the arguments of the latest call
/// 4. `<stem>ReceivedInvocations`, the arguments of every call
/// 5. `<stem>ReturnValue`, when the function returns a value
/// 6. `<stem>Closure`, the override closure
/// 7. the function itself
///
/// 3 and 4 are omitted for functions without parameters.
pub fn generate_function_mock(
    function: &FunctionSignature,
    stem: &NameStem,
    access: Option<&str>,
    ctx: &mut ExpansionContext,
) -> Vec<GeneratedMember> {
    for param in function.params.iter().filter(|p| p.is_variadic) {
        ctx.warn(
            "AutoMockable",
            "variadicParameter",
            format!(
                "variadic parameter '{}' of '{}' is not supported; it is recorded as an array",
                param.internal_name, function.name
            ),
            param.span,
        );
    }

    if function.effects.is_rethrowing() {
        ctx.warn(
            "AutoMockable",
            "rethrowingRequirement",
            format!("'{}' rethrows; its mock never throws on its own", function.name),
            function.span,
        );
    }

    let shape = classify_function(function);
    let names = CompanionNames::new(stem, &function.params);
    let modifiers = member_modifiers(access, function.is_static);
    let property = |name: &str, ty: TypeSyntax| VariableDecl::stored(name, ty).with_modifiers(modifiers.clone());

    let mut members = Vec::with_capacity(7);

    members.push(GeneratedMember::new(
        MemberRole::Counter,
        property(&names.calls_count, TypeSyntax::named("Int")).with_initializer(Expr::NumberLiteral("0".into())),
    ));

    let called = Expr::binary(Expr::ident(&names.calls_count), ">", Expr::NumberLiteral("0".into()));
    members.push(GeneratedMember::new(
        MemberRole::CalledFlag,
        property(&names.called, TypeSyntax::named("Bool"))
            .with_accessor(AccessorBlock::Getter(CodeBlock::new(vec![Stmt::Expr(called)]))),
    ));

    if let Some(received) = &names.received {
        let element = recorded_type(&function.params);
        members.push(GeneratedMember::new(
            MemberRole::ReceivedArguments,
            property(received, element.made_optional()),
        ));
        members.push(GeneratedMember::new(
            MemberRole::ReceivedInvocations,
            property(&names.received_invocations, TypeSyntax::array(element)).with_initializer(Expr::Array(Vec::new())),
        ));
    }

    if let Some(ret) = &function.return_type {
        members.push(GeneratedMember::new(
            MemberRole::ReturnValue,
            property(&names.return_value, ret.made_implicitly_unwrapped()),
        ));
    }

    let closure_type = TypeSyntax::Function(FunctionType {
        params: function.params.iter().map(Parameter::closure_type).collect(),
        is_async: shape.is_async,
        is_throwing: shape.is_throwing,
        thrown_type: function.effects.thrown_type().cloned().map(Box::new),
        return_type: Box::new(function.return_type.clone().unwrap_or_else(TypeSyntax::void)),
    });
    members.push(GeneratedMember::new(
        MemberRole::Closure,
        property(&names.closure, TypeSyntax::optional(closure_type)),
    ));

    members.push(GeneratedMember::new(
        MemberRole::Implementation,
        FunctionDecl {
            attributes: Vec::new(),
            modifiers,
            name: function.name.clone(),
            generic_clause: function.generic_clause.clone(),
            params: function.params.iter().map(Parameter::to_param).collect(),
            effects: function.effects.clone(),
            return_type: function.return_type.clone(),
            body: Some(CodeBlock::new(implementation_body(function, &names))),
            span: Default::default(),
        },
    ));

    members
}

/// Names of the companion members of one function
struct CompanionNames {
    calls_count: String,
    called: String,
    /// `None` when the function takes no parameters
    received: Option<String>,
    received_invocations: String,
    return_value: String,
    closure: String,
}

impl CompanionNames {
    fn new(stem: &NameStem, params: &[Parameter]) -> Self {
        let received = match params {
            [] => None,
            [single] => Some(stem.member(&format!("Received{}", capitalize_first(&single.internal_name)))),
            _ => Some(stem.member("ReceivedArguments")),
        };
        Self {
            calls_count: stem.member("CallsCount"),
            called: stem.member("Called"),
            received,
            received_invocations: stem.member("ReceivedInvocations"),
            return_value: stem.member("ReturnValue"),
            closure: stem.member("Closure"),
        }
    }
}

/// Type recorded per call: the parameter's own type for one parameter, a
/// tuple labelled with the local names otherwise.
fn recorded_type(params: &[Parameter]) -> TypeSyntax {
    match params {
        [single] => single.stored_type(),
        _ => TypeSyntax::Tuple(
            params
                .iter()
                .map(|p| TupleTypeElement {
                    label: Some(p.internal_name.clone()),
                    ty: p.stored_type(),
                })
                .collect(),
        ),
    }
}

/// The value recorded for the current call
fn recorded_value(params: &[Parameter]) -> Expr {
    match params {
        [single] => Expr::ident(&single.internal_name),
        _ => Expr::Tuple(
            params
                .iter()
                .map(|p| Argument::labeled(&p.internal_name, Expr::ident(&p.internal_name)))
                .collect(),
        ),
    }
}

fn implementation_body(function: &FunctionSignature, names: &CompanionNames) -> Vec<Stmt> {
    let mut body = vec![Stmt::add_assign(
        Expr::ident(&names.calls_count),
        Expr::NumberLiteral("1".into()),
    )];

    if let Some(received) = &names.received {
        let value = recorded_value(&function.params);
        body.push(Stmt::assign(Expr::ident(received), value.clone()));
        body.push(Stmt::Expr(Expr::call(
            Expr::member(Expr::ident(&names.received_invocations), "append"),
            vec![Argument::unlabeled(value)],
        )));
    }

    let arguments: Vec<Argument> = function
        .params
        .iter()
        .map(|p| Argument::unlabeled(p.forwarded()))
        .collect();

    if function.return_type.is_some() {
        let call = Expr::call(Expr::ident(&names.closure), arguments)
            .with_effects(function.is_async(), function.is_throwing());
        body.push(Stmt::IfLet {
            binding: names.closure.clone(),
            value: Expr::ident(&names.closure),
            then_branch: vec![Stmt::Return(Some(call))],
            else_branch: Some(vec![Stmt::Return(Some(Expr::ident(&names.return_value)))]),
        });
    } else {
        let call = Expr::call(Expr::OptionalChain(Box::new(Expr::ident(&names.closure))), arguments)
            .with_effects(function.is_async(), function.is_throwing());
        body.push(Stmt::Expr(call));
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionConfig;
    use crate::naming::stem;
    use pretty_assertions::assert_eq;
    use siberian_syntax::{parse, print_decls};

    fn mock(requirement: &str) -> (Vec<GeneratedMember>, String, usize) {
        let file = parse(&format!("protocol P {{\n    {}\n}}", requirement)).unwrap();
        let decl = file.type_decls().next().unwrap().functions().next().unwrap();
        let function = FunctionSignature::from_decl(decl);
        let config = ExpansionConfig::default();
        let mut ctx = ExpansionContext::new(&config);
        let members = generate_function_mock(&function, &stem(&function), None, &mut ctx);
        let decls: Vec<Decl> = members.iter().map(|m| m.decl.clone()).collect();
        let text = print_decls(&decls, 4);
        (members, text, ctx.diagnostics().len())
    }

    fn roles(members: &[GeneratedMember]) -> Vec<MemberRole> {
        members.iter().map(|m| m.role).collect()
    }

    #[test]
    fn test_no_params_no_return() {
        let (members, text, _) = mock("func someMethod()");
        assert_eq!(
            roles(&members),
            [
                MemberRole::Counter,
                MemberRole::CalledFlag,
                MemberRole::Closure,
                MemberRole::Implementation
            ]
        );
        assert_eq!(
            text,
            "var someMethodCallsCount: Int = 0
var someMethodCalled: Bool { someMethodCallsCount > 0 }
var someMethodClosure: (() -> Void)?
func someMethod() {
    someMethodCallsCount += 1
    someMethodClosure?()
}"
        );
    }

    #[test]
    fn test_single_param_with_return() {
        let (_, text, _) = mock("func load(url: String) -> Data");
        assert_eq!(
            text,
            "var loadUrlCallsCount: Int = 0
var loadUrlCalled: Bool { loadUrlCallsCount > 0 }
var loadUrlReceivedUrl: String?
var loadUrlReceivedInvocations: [String] = []
var loadUrlReturnValue: Data!
var loadUrlClosure: ((String) -> Data)?
func load(url: String) -> Data {
    loadUrlCallsCount += 1
    loadUrlReceivedUrl = url
    loadUrlReceivedInvocations.append(url)
    if let loadUrlClosure = loadUrlClosure {
        return loadUrlClosure(url)
    } else {
        return loadUrlReturnValue
    }
}"
        );
    }

    #[test]
    fn test_multiple_params_async_throws() {
        let (_, text, _) = mock("func fetch(_ id: Int, for key: String?) async throws");
        assert_eq!(
            text,
            "var fetchForCallsCount: Int = 0
var fetchForCalled: Bool { fetchForCallsCount > 0 }
var fetchForReceivedArguments: (id: Int, key: String?)?
var fetchForReceivedInvocations: [(id: Int, key: String?)] = []
var fetchForClosure: ((Int, String?) async throws -> Void)?
func fetch(_ id: Int, for key: String?) async throws {
    fetchForCallsCount += 1
    fetchForReceivedArguments = (id: id, key: key)
    fetchForReceivedInvocations.append((id: id, key: key))
    try await fetchForClosure?(id, key)
}"
        );
    }

    #[test]
    fn test_optional_return_stays_optional() {
        let (members, _, _) = mock("func current() -> String?");
        let ret = members.iter().find(|m| m.role == MemberRole::ReturnValue).unwrap();
        assert_eq!(
            siberian_syntax::print_decl(&ret.decl),
            "var currentReturnValue: String?"
        );
    }

    #[test]
    fn test_inout_and_escaping_params() {
        let (_, text, _) = mock("func update(_ value: inout Int, completion: @escaping () -> Void)");
        assert!(text.contains("var updateCompletionReceivedArguments: (value: Int, completion: () -> Void)?"));
        assert!(text.contains("var updateCompletionClosure: ((inout Int, @escaping () -> Void) -> Void)?"));
        assert!(text.contains("    updateCompletionClosure?(&value, completion)"));
    }

    #[test]
    fn test_variadic_param_warns() {
        let (_, text, warnings) = mock("func someMethodWith(args: Int...) -> Bool");
        assert_eq!(warnings, 1);
        assert!(text.contains("var someMethodWithArgsReceivedArgs: [Int]?"));
        assert!(text.contains("var someMethodWithArgsClosure: (([Int]) -> Bool)?"));
        assert!(text.contains("func someMethodWith(args: Int...) -> Bool {"));
    }

    #[test]
    fn test_typed_throws_reach_closure_and_implementation() {
        let (_, text, warnings) = mock("func decode(_ data: Data) throws(DecodingError) -> Model");
        assert_eq!(warnings, 0);
        assert!(text.contains("var decodeClosure: ((Data) throws(DecodingError) -> Model)?"));
        assert!(text.contains("func decode(_ data: Data) throws(DecodingError) -> Model {"));
        assert!(text.contains("        return try decodeClosure(data)"));
    }

    #[test]
    fn test_rethrows_mock_calls_without_try() {
        let (_, text, warnings) = mock("func perform(_ operation: () throws -> Void) rethrows");
        assert_eq!(warnings, 1);
        assert!(text.contains("var performClosure: ((() throws -> Void) -> Void)?"));
        assert!(text.contains("func perform(_ operation: () throws -> Void) rethrows {"));
        assert!(text.contains("    performClosure?(operation)"));
        assert!(!text.contains("try"), "{}", text);
    }

    #[test]
    fn test_static_requirement() {
        let (members, _, _) = mock("static func make() -> Self");
        for member in &members {
            let is_static = match &member.decl {
                Decl::Variable(var) => var.is_type_level(),
                Decl::Function(func) => func.is_type_level(),
                _ => false,
            };
            assert!(is_static, "{:?} is not static", member.name());
        }
    }
}
