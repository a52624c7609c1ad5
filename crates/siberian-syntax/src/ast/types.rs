//! Type syntax nodes
//!
//! Types are kept as written: the generators only ask structural questions
//! (is it optional? what does it print as?) and never resolve names.

use std::fmt;

/// A type as spelled in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax {
    /// `Int`, `Swift.Result<A, B>`, `Foo.Type`
    Named {
        name: String,
        generic_args: Vec<TypeSyntax>,
    },

    /// `T?`
    Optional(Box<TypeSyntax>),

    /// `T!`
    ImplicitlyUnwrapped(Box<TypeSyntax>),

    /// `[T]`
    Array(Box<TypeSyntax>),

    /// `[K: V]`
    Dictionary {
        key: Box<TypeSyntax>,
        value: Box<TypeSyntax>,
    },

    /// `(a: A, B)`, `()`
    Tuple(Vec<TupleTypeElement>),

    /// `(A, B) async throws -> R`
    Function(FunctionType),

    /// `A & B`
    Composition(Vec<TypeSyntax>),

    /// `some P`, `any P`
    Existential {
        keyword: String,
        base: Box<TypeSyntax>,
    },

    /// `inout T`, `@escaping T`, `@Sendable @escaping T`
    Attributed {
        specifier: Option<String>,
        attributes: Vec<String>,
        base: Box<TypeSyntax>,
    },
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleTypeElement {
    pub label: Option<String>,
    pub ty: TypeSyntax,
}

/// A function type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub params: Vec<TypeSyntax>,
    pub is_async: bool,
    pub is_throwing: bool,
    /// `E` in `throws(E)`
    pub thrown_type: Option<Box<TypeSyntax>>,
    pub return_type: Box<TypeSyntax>,
}

impl TypeSyntax {
    /// A plain named type without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeSyntax::Named {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    pub fn optional(inner: TypeSyntax) -> Self {
        TypeSyntax::Optional(Box::new(inner))
    }

    pub fn implicitly_unwrapped(inner: TypeSyntax) -> Self {
        TypeSyntax::ImplicitlyUnwrapped(Box::new(inner))
    }

    pub fn array(element: TypeSyntax) -> Self {
        TypeSyntax::Array(Box::new(element))
    }

    /// `Void`, spelled the way generated closures use it.
    pub fn void() -> Self {
        TypeSyntax::named("Void")
    }

    /// True when the outermost layer carries an optional marker (`?` or `!`).
    ///
    /// Attributes and specifiers are looked through: `@escaping (() -> Void)?`
    /// is optional.
    pub fn is_optional(&self) -> bool {
        match self {
            TypeSyntax::Optional(_) | TypeSyntax::ImplicitlyUnwrapped(_) => true,
            TypeSyntax::Attributed { base, .. } => base.is_optional(),
            _ => false,
        }
    }

    /// Drops parameter-only attributes and ownership specifiers.
    ///
    /// `inout Int` becomes `Int` and `@escaping () -> Void` becomes
    /// `() -> Void`, which is what a stored property of that type needs.
    pub fn without_attributes(&self) -> TypeSyntax {
        match self {
            TypeSyntax::Attributed { base, .. } => base.without_attributes(),
            other => other.clone(),
        }
    }

    /// Wraps in `?` unless the type is already optional.
    pub fn made_optional(&self) -> TypeSyntax {
        if self.is_optional() {
            self.clone()
        } else {
            TypeSyntax::optional(self.clone())
        }
    }

    /// Wraps in `!` unless the type is already optional.
    pub fn made_implicitly_unwrapped(&self) -> TypeSyntax {
        if self.is_optional() {
            self.clone()
        } else {
            TypeSyntax::implicitly_unwrapped(self.clone())
        }
    }

    /// True for `inout` parameters.
    pub fn is_inout(&self) -> bool {
        matches!(self, TypeSyntax::Attributed { specifier: Some(s), .. } if s == "inout")
    }

    /// Needs parentheses when followed by a postfix `?`/`!`.
    fn needs_parens_for_postfix(&self) -> bool {
        matches!(
            self,
            TypeSyntax::Function(_)
                | TypeSyntax::Composition(_)
                | TypeSyntax::Existential { .. }
                | TypeSyntax::Attributed { .. }
        )
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Named { name, generic_args } => {
                write!(f, "{}", name)?;
                if !generic_args.is_empty() {
                    write!(f, "<")?;
                    write_comma_separated(f, generic_args)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeSyntax::Optional(inner) => {
                if inner.needs_parens_for_postfix() {
                    write!(f, "({})?", inner)
                } else {
                    write!(f, "{}?", inner)
                }
            }
            TypeSyntax::ImplicitlyUnwrapped(inner) => {
                if inner.needs_parens_for_postfix() {
                    write!(f, "({})!", inner)
                } else {
                    write!(f, "{}!", inner)
                }
            }
            TypeSyntax::Array(element) => write!(f, "[{}]", element),
            TypeSyntax::Dictionary { key, value } => write!(f, "[{}: {}]", key, value),
            TypeSyntax::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(label) = &element.label {
                        write!(f, "{}: ", label)?;
                    }
                    write!(f, "{}", element.ty)?;
                }
                write!(f, ")")
            }
            TypeSyntax::Function(function) => write!(f, "{}", function),
            TypeSyntax::Composition(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
            TypeSyntax::Existential { keyword, base } => write!(f, "{} {}", keyword, base),
            TypeSyntax::Attributed {
                specifier,
                attributes,
                base,
            } => {
                if let Some(specifier) = specifier {
                    write!(f, "{} ", specifier)?;
                }
                for attribute in attributes {
                    write!(f, "{} ", attribute)?;
                }
                write!(f, "{}", base)
            }
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_comma_separated(f, &self.params)?;
        write!(f, ")")?;
        if self.is_async {
            write!(f, " async")?;
        }
        match &self.thrown_type {
            Some(error) => write!(f, " throws({})", error)?,
            None if self.is_throwing => write!(f, " throws")?,
            None => {}
        }
        write!(f, " -> {}", self.return_type)
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, types: &[TypeSyntax]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closure(params: Vec<TypeSyntax>, ret: TypeSyntax) -> TypeSyntax {
        TypeSyntax::Function(FunctionType {
            params,
            is_async: true,
            is_throwing: true,
            thrown_type: None,
            return_type: Box::new(ret),
        })
    }

    #[test]
    fn test_optional_function_type_is_parenthesized() {
        let ty = TypeSyntax::optional(closure(vec![TypeSyntax::named("Int")], TypeSyntax::void()));
        assert_eq!(ty.to_string(), "((Int) async throws -> Void)?");
    }

    #[test]
    fn test_made_optional_keeps_existing_marker() {
        let ty = TypeSyntax::optional(TypeSyntax::named("String"));
        assert_eq!(ty.made_optional().to_string(), "String?");
        assert_eq!(TypeSyntax::named("Int").made_implicitly_unwrapped().to_string(), "Int!");
    }

    #[test]
    fn test_without_attributes_strips_escaping_and_inout() {
        let ty = TypeSyntax::Attributed {
            specifier: None,
            attributes: vec!["@escaping".into()],
            base: Box::new(closure(vec![], TypeSyntax::void())),
        };
        assert_eq!(ty.to_string(), "@escaping () async throws -> Void");
        assert_eq!(ty.without_attributes().to_string(), "() async throws -> Void");
    }

    #[test]
    fn test_tuple_and_collection_display() {
        let ty = TypeSyntax::array(TypeSyntax::Tuple(vec![
            TupleTypeElement {
                label: Some("a".into()),
                ty: TypeSyntax::named("Int"),
            },
            TupleTypeElement {
                label: Some("b".into()),
                ty: TypeSyntax::Dictionary {
                    key: Box::new(TypeSyntax::named("String")),
                    value: Box::new(TypeSyntax::named("Any")),
                },
            },
        ]));
        assert_eq!(ty.to_string(), "[(a: Int, b: [String: Any])]");
    }
}
