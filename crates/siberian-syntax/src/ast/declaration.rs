//! Declaration AST nodes
//!
//! This module defines the declarations the macros read and write:
//! - Type declarations (protocol, struct, class, enum, actor, extension)
//! - Properties with their accessor blocks
//! - Functions and initializers
//! - Enum cases, type aliases, associated types and imports

use super::*;
use crate::token::Span;

/// Any declaration, at file level or inside a member block
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `import Foundation`
    Import(ImportDecl),

    /// protocol / struct / class / enum / actor / extension
    Type(TypeDecl),

    /// `var` / `let`
    Variable(VariableDecl),

    /// `func`
    Function(FunctionDecl),

    /// `init`
    Initializer(InitializerDecl),

    /// `deinit { ... }`
    Deinitializer(DeinitializerDecl),

    /// `case a, b = "x"`
    EnumCase(EnumCaseDecl),

    /// `typealias Name = Type`
    Typealias(TypealiasDecl),

    /// `associatedtype Name`
    AssociatedType(AssociatedTypeDecl),

    /// Stepped over without a model of its contents
    Skipped(SkippedDecl),
}

impl Decl {
    /// Get the span of this declaration
    pub fn span(&self) -> &Span {
        match self {
            Decl::Import(d) => &d.span,
            Decl::Type(d) => &d.span,
            Decl::Variable(d) => &d.span,
            Decl::Function(d) => &d.span,
            Decl::Initializer(d) => &d.span,
            Decl::Deinitializer(d) => &d.span,
            Decl::EnumCase(d) => &d.span,
            Decl::Typealias(d) => &d.span,
            Decl::AssociatedType(d) => &d.span,
            Decl::Skipped(d) => &d.span,
        }
    }

    /// Attributes attached to this declaration
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Decl::Type(d) => &d.attributes,
            Decl::Variable(d) => &d.attributes,
            Decl::Function(d) => &d.attributes,
            Decl::Initializer(d) => &d.attributes,
            Decl::EnumCase(d) => &d.attributes,
            Decl::Skipped(d) => &d.attributes,
            Decl::Import(_)
            | Decl::Deinitializer(_)
            | Decl::Typealias(_)
            | Decl::AssociatedType(_) => &[],
        }
    }

    pub fn as_type(&self) -> Option<&TypeDecl> {
        match self {
            Decl::Type(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDecl> {
        match self {
            Decl::Variable(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match self {
            Decl::Function(d) => Some(d),
            _ => None,
        }
    }

    /// Short description used in diagnostics ("protocol", "enum", "func", ...)
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Import(_) => "import",
            Decl::Type(d) => d.kind.keyword(),
            Decl::Variable(d) => d.binding.keyword(),
            Decl::Function(_) => "func",
            Decl::Initializer(_) => "init",
            Decl::Deinitializer(_) => "deinit",
            Decl::EnumCase(_) => "case",
            Decl::Typealias(_) => "typealias",
            Decl::AssociatedType(_) => "associatedtype",
            Decl::Skipped(d) => d.kind.describe(),
        }
    }
}

impl From<TypeDecl> for Decl {
    fn from(decl: TypeDecl) -> Self {
        Decl::Type(decl)
    }
}

impl From<VariableDecl> for Decl {
    fn from(decl: VariableDecl) -> Self {
        Decl::Variable(decl)
    }
}

impl From<FunctionDecl> for Decl {
    fn from(decl: FunctionDecl) -> Self {
        Decl::Function(decl)
    }
}

impl From<InitializerDecl> for Decl {
    fn from(decl: InitializerDecl) -> Self {
        Decl::Initializer(decl)
    }
}

impl From<EnumCaseDecl> for Decl {
    fn from(decl: EnumCaseDecl) -> Self {
        Decl::EnumCase(decl)
    }
}

// ============================================================================
// Attributes and modifiers
// ============================================================================

/// `@Name` or `@Name(label: value, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub arguments: Option<Vec<AttributeArgument>>,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
            span: Span::default(),
        }
    }

    /// First argument with the given label
    pub fn argument(&self, label: &str) -> Option<&AttributeArgument> {
        self.arguments
            .as_deref()?
            .iter()
            .find(|arg| arg.label.as_deref() == Some(label))
    }

    /// First argument regardless of label
    pub fn first_argument(&self) -> Option<&AttributeArgument> {
        self.arguments.as_deref()?.first()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArgument {
    pub label: Option<String>,
    pub value: Expr,
    pub span: Span,
}

/// A declaration modifier (`public`, `static`, `private(set)`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    /// Parenthesized detail, e.g. `set` in `private(set)`
    pub detail: Option<String>,
    pub span: Span,
}

impl Modifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
            span: Span::default(),
        }
    }
}

/// Access-control modifier names
pub const ACCESS_MODIFIERS: &[&str] = &["open", "public", "package", "internal", "fileprivate", "private"];

/// Helpers shared by everything that carries modifiers
pub trait HasModifiers {
    fn modifiers(&self) -> &[Modifier];

    fn has_modifier(&self, name: &str) -> bool {
        self.modifiers().iter().any(|m| m.name == name)
    }

    /// `static` or `class` (type-level member)
    fn is_type_level(&self) -> bool {
        self.has_modifier("static") || self.has_modifier("class")
    }

    /// Access modifier without a detail (`public`, not `private(set)`)
    fn access_level(&self) -> Option<&str> {
        self.modifiers()
            .iter()
            .find(|m| m.detail.is_none() && ACCESS_MODIFIERS.contains(&m.name.as_str()))
            .map(|m| m.name.as_str())
    }
}

// ============================================================================
// Import
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: String,
    pub span: Span,
}

// ============================================================================
// Type declarations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Protocol,
    Struct,
    Class,
    Enum,
    Actor,
    Extension,
}

impl TypeDeclKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeDeclKind::Protocol => "protocol",
            TypeDeclKind::Struct => "struct",
            TypeDeclKind::Class => "class",
            TypeDeclKind::Enum => "enum",
            TypeDeclKind::Actor => "actor",
            TypeDeclKind::Extension => "extension",
        }
    }

    /// Struct, class and actor declarations can hold stored properties.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            TypeDeclKind::Struct | TypeDeclKind::Class | TypeDeclKind::Actor
        )
    }
}

/// A type declaration with a member block
///
/// # Example
/// ```text
/// @AutoMockable
/// protocol Service: AnyObject {
///     var name: String { get }
///     func fetch(id: Int) async throws -> Data
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub kind: TypeDeclKind,
    pub name: String,
    /// Generic parameter clause as written (`<T: Equatable>`), if any
    pub generic_clause: Option<String>,
    pub inheritance: Vec<TypeSyntax>,
    pub members: MemberBlock,
    pub span: Span,
}

impl HasModifiers for TypeDecl {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

impl TypeDecl {
    /// Property declarations, in order
    pub fn variables(&self) -> impl Iterator<Item = &VariableDecl> {
        self.members.decls.iter().filter_map(Decl::as_variable)
    }

    /// Function declarations, in order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.members.decls.iter().filter_map(Decl::as_function)
    }

    /// Initializer declarations, in order
    pub fn initializers(&self) -> impl Iterator<Item = &InitializerDecl> {
        self.members.decls.iter().filter_map(|decl| match decl {
            Decl::Initializer(init) => Some(init),
            _ => None,
        })
    }
}

/// `{ members }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberBlock {
    pub decls: Vec<Decl>,
    /// Span of the opening brace
    pub open: Span,
    /// Span of the closing brace
    pub close: Span,
}

impl MemberBlock {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self {
            decls,
            ..Self::default()
        }
    }
}

// ============================================================================
// Variable declarations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
}

impl BindingKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BindingKind::Var => "var",
            BindingKind::Let => "let",
        }
    }
}

/// `var a: Int = 1, b: Int { get }`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub binding: BindingKind,
    pub bindings: Vec<PatternBinding>,
    pub span: Span,
}

impl HasModifiers for VariableDecl {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

impl VariableDecl {
    /// A single-binding `var name: ty` without initializer or accessors.
    pub fn stored(name: impl Into<String>, ty: TypeSyntax) -> Self {
        Self {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            binding: BindingKind::Var,
            bindings: vec![PatternBinding {
                pattern: Pattern::Identifier(name.into()),
                type_annotation: Some(ty),
                initializer: None,
                accessor: None,
                span: Span::default(),
            }],
            span: Span::default(),
        }
    }

    pub fn with_initializer(mut self, value: Expr) -> Self {
        if let Some(binding) = self.bindings.first_mut() {
            binding.initializer = Some(value);
        }
        self
    }

    pub fn with_accessor(mut self, accessor: AccessorBlock) -> Self {
        if let Some(binding) = self.bindings.first_mut() {
            binding.accessor = Some(accessor);
        }
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Name bound by the first binding, when it is a plain identifier
    pub fn property_name(&self) -> Option<&str> {
        self.bindings.first()?.pattern.identifier()
    }
}

/// One `pattern: Type = value { accessors }` entry
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBinding {
    pub pattern: Pattern,
    pub type_annotation: Option<TypeSyntax>,
    pub initializer: Option<Expr>,
    pub accessor: Option<AccessorBlock>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Identifier(String),
    Wildcard,
    Tuple(Vec<Pattern>),
}

impl Pattern {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Pattern::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// The `{ ... }` after a property
#[derive(Debug, Clone, PartialEq)]
pub enum AccessorBlock {
    /// `{ get set }`, `{ get { ... } set { ... } }`, `{ didSet { ... } }`
    Accessors(Vec<Accessor>),

    /// `{ expression }`, an implicit getter
    Getter(CodeBlock),
}

impl AccessorBlock {
    pub fn has(&self, kind: AccessorKind) -> bool {
        match self {
            AccessorBlock::Accessors(accessors) => accessors.iter().any(|a| a.kind == kind),
            AccessorBlock::Getter(_) => kind == AccessorKind::Get,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub modifiers: Vec<Modifier>,
    /// `set(value)` / `willSet(value)`
    pub parameter: Option<String>,
    pub effects: Effects,
    pub body: Option<CodeBlock>,
}

impl Accessor {
    pub fn new(kind: AccessorKind, body: Option<CodeBlock>) -> Self {
        Self {
            kind,
            modifiers: Vec::new(),
            parameter: None,
            effects: Effects::default(),
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
    Read,
    Modify,
    Init,
}

impl AccessorKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "get" => Some(AccessorKind::Get),
            "set" => Some(AccessorKind::Set),
            "willSet" => Some(AccessorKind::WillSet),
            "didSet" => Some(AccessorKind::DidSet),
            "_read" => Some(AccessorKind::Read),
            "_modify" => Some(AccessorKind::Modify),
            "init" => Some(AccessorKind::Init),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::WillSet => "willSet",
            AccessorKind::DidSet => "didSet",
            AccessorKind::Read => "_read",
            AccessorKind::Modify => "_modify",
            AccessorKind::Init => "init",
        }
    }

    /// Property observers leave a property stored.
    pub fn is_observer(&self) -> bool {
        matches!(self, AccessorKind::WillSet | AccessorKind::DidSet)
    }
}

/// `{ statements }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlock {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl CodeBlock {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self {
            statements,
            span: Span::default(),
        }
    }
}

// ============================================================================
// Skipped constructs
// ============================================================================

/// Source the parser steps over: its span is kept so the text survives
/// expansion untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDecl {
    pub kind: SkippedKind,
    /// Attributes written before a skipped member, e.g. on a `subscript`
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkippedKind {
    Subscript,
    /// `#if ... #endif`, including every branch
    ConditionalBlock,
    /// `#warning(...)`, `#sourceLocation(...)` and friends
    Directive,
    /// Executable code at file level
    Statement,
}

impl SkippedKind {
    pub fn describe(&self) -> &'static str {
        match self {
            SkippedKind::Subscript => "subscript",
            SkippedKind::ConditionalBlock => "conditional compilation block",
            SkippedKind::Directive => "compiler directive",
            SkippedKind::Statement => "statement",
        }
    }
}

// ============================================================================
// Functions and initializers
// ============================================================================

/// `async`, `throws` / `throws(E)` / `rethrows`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Effects {
    pub is_async: bool,
    pub throws: Option<ThrowsKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrowsKind {
    Throws,
    Rethrows,
    /// `throws(NetworkError)`
    Typed(TypeSyntax),
}

impl Effects {
    pub fn is_throwing(&self) -> bool {
        self.throws.is_some()
    }

    pub fn is_rethrowing(&self) -> bool {
        self.throws == Some(ThrowsKind::Rethrows)
    }

    /// The error type of a typed `throws(E)` clause.
    pub fn thrown_type(&self) -> Option<&TypeSyntax> {
        match &self.throws {
            Some(ThrowsKind::Typed(ty)) => Some(ty),
            _ => None,
        }
    }
}

/// `func name(params) async throws -> Type { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub generic_clause: Option<String>,
    pub params: Vec<Param>,
    pub effects: Effects,
    pub return_type: Option<TypeSyntax>,
    pub body: Option<CodeBlock>,
    pub span: Span,
}

impl HasModifiers for FunctionDecl {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

/// Function or initializer parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Argument label; `None` for `_`
    pub external_name: Option<String>,
    /// Name used inside the body
    pub internal_name: String,
    pub ty: TypeSyntax,
    pub is_variadic: bool,
    pub default_value: Option<Expr>,
    pub span: Span,
}

impl Param {
    /// `name: ty`, label and local name identical
    pub fn new(name: impl Into<String>, ty: TypeSyntax) -> Self {
        let name = name.into();
        Self {
            external_name: Some(name.clone()),
            internal_name: name,
            ty,
            is_variadic: false,
            default_value: None,
            span: Span::default(),
        }
    }
}

/// `init(params) throws { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct InitializerDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    /// `init?` / `init!`
    pub failable: Option<char>,
    pub params: Vec<Param>,
    pub effects: Effects,
    pub body: Option<CodeBlock>,
    pub span: Span,
}

impl HasModifiers for InitializerDecl {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeinitializerDecl {
    pub body: Option<CodeBlock>,
    pub span: Span,
}

// ============================================================================
// Enum cases, aliases
// ============================================================================

/// `case a, b = "x"`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCaseDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub elements: Vec<EnumCaseElement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumCaseElement {
    pub name: String,
    /// Associated value clause as written, e.g. `(Int, label: String)`
    pub associated_values: Option<String>,
    pub raw_value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypealiasDecl {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub ty: TypeSyntax,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssociatedTypeDecl {
    pub name: String,
    pub span: Span,
}
